use std::io::Write;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info, trace, warn};

use crate::decode::decode_packet;
use crate::packet::PacketMeta;
use crate::rules::{Rule, RuleError, RuleOutcome};
use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{InputInfo, RunSummary, make_summary};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("failed to write rule output: {0}")]
    Output(#[source] std::io::Error),
    #[error("rule failed on frame {frame}: {source}")]
    Rule {
        frame: u64,
        #[source]
        source: RuleError,
    },
}

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop at the first rule error instead of logging and skipping it.
    pub strict: bool,
}

/// Evaluate `rule` on every packet of a PCAP/PCAPNG file.
pub fn run_pcap_file<W: Write>(
    path: &Path,
    rule: &dyn Rule,
    options: RunOptions,
    out: &mut W,
) -> Result<RunSummary, EngineError> {
    let source = PcapFileSource::open(path)?;
    let mut summary = run_source(source, rule, options, out)?;
    summary.input = Some(InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    });
    Ok(summary)
}

/// Evaluate `rule` once per packet of `source`, in capture order.
///
/// Emitted text is written to `out` followed by a newline. Undecodable
/// packets and unhandled packets produce no output.
pub fn run_source<S: PacketSource, W: Write>(
    mut source: S,
    rule: &dyn Rule,
    options: RunOptions,
    out: &mut W,
) -> Result<RunSummary, EngineError> {
    let mut summary = make_summary(rule.name());
    let mut first_ts = None;
    let mut last_ts = None;
    info!(rule = rule.name(), strict = options.strict, "run started");

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        summary.packets_total += 1;
        let frame = summary.packets_total;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let meta = PacketMeta {
            frame,
            timestamp: ts,
            length: data.len(),
        };
        let packet = match decode_packet(meta, linktype, &data) {
            Ok(packet) => packet,
            Err(err) => {
                debug!(frame, %err, "skipping undecodable packet");
                summary.decode_errors += 1;
                continue;
            }
        };

        match rule.evaluate(&packet.view()) {
            Ok(RuleOutcome::Emit(text)) => {
                writeln!(out, "{text}").map_err(EngineError::Output)?;
                summary.emitted += 1;
            }
            Ok(RuleOutcome::Unhandled) => {
                trace!(frame, "packet not handled by rule");
                summary.unhandled += 1;
            }
            Err(err) if options.strict => {
                return Err(EngineError::Rule { frame, source: err });
            }
            Err(err) => {
                warn!(frame, rule = rule.name(), %err, "rule evaluation failed");
                summary.rule_errors += 1;
            }
        }
    }
    out.flush().map_err(EngineError::Output)?;

    summary.time_start = ts_to_rfc3339(first_ts);
    summary.time_end = ts_to_rfc3339(last_ts);
    info!(
        packets = summary.packets_total,
        emitted = summary.emitted,
        unhandled = summary.unhandled,
        decode_errors = summary.decode_errors,
        rule_errors = summary.rule_errors,
        "run finished"
    );
    Ok(summary)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

pub(crate) fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
