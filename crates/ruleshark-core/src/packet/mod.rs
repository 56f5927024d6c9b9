//! Layer-indexed packet view.
//!
//! A decoded packet is an ordered list of layers, outermost first, as
//! produced by the decoder. Rules never see raw bytes: they query a
//! `PacketView` by layer name or by position and read typed `LayerInfo`
//! records.
//!
//! Lookup contract:
//! - `contains_layer` is exact and case-sensitive, and absence is a normal
//!   `false`, not an error.
//! - `layer_index` fails with `LayerError::NotFound` for an absent layer.
//! - Positional access uses the index returned by `layer_index`.
//!
//! # Examples
//! ```
//! use ruleshark_core::{Layer, LayerInfo, Packet, PacketMeta, UdpInfo};
//!
//! let packet = Packet::new(
//!     PacketMeta::new(1),
//!     vec![Layer::new(LayerInfo::Udp(UdpInfo {
//!         src_port: 5353,
//!         dst_port: 53,
//!         length: 8,
//!         checksum: 0,
//!     }))],
//! );
//! let view = packet.view();
//! assert!(view.contains_layer("UDP"));
//! assert!(!view.contains_layer("TCP"));
//! let index = view.layer_index("UDP")?;
//! assert_eq!(view[index].name(), "UDP");
//! # Ok::<(), ruleshark_core::LayerError>(())
//! ```

mod error;
mod layer;

use std::fmt;
use std::ops::Index;

pub use error::LayerError;
pub use layer::{
    EthernetInfo, IcmpInfo, Ipv4Info, Ipv6Info, Layer, LayerInfo, LayerKind, PayloadInfo,
    TcpInfo, TransportPorts, UdpInfo, UnknownLayerName,
};

use crate::engine::ts_to_rfc3339;

/// Capture metadata attached to a decoded packet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PacketMeta {
    /// 1-based position of the packet in its capture.
    pub frame: u64,
    /// Capture timestamp in seconds, when known.
    pub timestamp: Option<f64>,
    /// Captured length in bytes.
    pub length: usize,
}

impl PacketMeta {
    pub fn new(frame: u64) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }
}

/// Owned, immutable decoded packet.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    meta: PacketMeta,
    layers: Vec<Layer>,
}

impl Packet {
    pub fn new(meta: PacketMeta, layers: Vec<Layer>) -> Self {
        Self { meta, layers }
    }

    pub fn meta(&self) -> &PacketMeta {
        &self.meta
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn view(&self) -> PacketView<'_> {
        PacketView {
            meta: &self.meta,
            layers: &self.layers,
        }
    }
}

/// Read-only view over one decoded packet, passed to rules.
#[derive(Debug, Clone, Copy)]
pub struct PacketView<'a> {
    meta: &'a PacketMeta,
    layers: &'a [Layer],
}

impl<'a> PacketView<'a> {
    pub fn meta(&self) -> &'a PacketMeta {
        self.meta
    }

    pub fn layers(&self) -> &'a [Layer] {
        self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Layer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns true iff a layer named exactly `name` was decoded.
    pub fn contains_layer(&self, name: &str) -> bool {
        self.layers.iter().any(|layer| layer.name() == name)
    }

    /// Position of the layer named `name`, in decode order.
    ///
    /// # Errors
    /// `LayerError::NotFound` when `contains_layer(name)` is false.
    pub fn layer_index(&self, name: &str) -> Result<usize, LayerError> {
        self.layers
            .iter()
            .position(|layer| layer.name() == name)
            .ok_or_else(|| LayerError::NotFound {
                name: name.to_string(),
            })
    }

    pub fn get(&self, index: usize) -> Option<&'a Layer> {
        self.layers.get(index)
    }

    /// Info record of the layer at `index`.
    ///
    /// # Errors
    /// `LayerError::OutOfRange` when `index` is past the last layer.
    pub fn info_at(&self, index: usize) -> Result<&'a LayerInfo, LayerError> {
        self.get(index)
            .map(Layer::info)
            .ok_or(LayerError::OutOfRange {
                index,
                len: self.layers.len(),
            })
    }

    pub fn find(&self, kind: LayerKind) -> Option<&'a LayerInfo> {
        self.layers
            .iter()
            .find(|layer| layer.kind() == kind)
            .map(Layer::info)
    }

    pub fn ipv4(&self) -> Option<&'a Ipv4Info> {
        self.find(LayerKind::Ipv4).and_then(LayerInfo::as_ipv4)
    }

    pub fn tcp(&self) -> Option<&'a TcpInfo> {
        self.find(LayerKind::Tcp).and_then(LayerInfo::as_tcp)
    }

    pub fn udp(&self) -> Option<&'a UdpInfo> {
        self.find(LayerKind::Udp).and_then(LayerInfo::as_udp)
    }

    pub fn payload(&self) -> Option<&'a PayloadInfo> {
        self.find(LayerKind::Payload).and_then(LayerInfo::as_payload)
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(Layer::name).collect()
    }
}

impl Index<usize> for PacketView<'_> {
    type Output = Layer;

    fn index(&self, index: usize) -> &Layer {
        &self.layers[index]
    }
}

impl<'a> IntoIterator for PacketView<'a> {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// Multi-line description, one line per layer.
impl fmt::Display for PacketView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PACKET #{}: {} bytes, {} layers",
            self.meta.frame,
            self.meta.length,
            self.layers.len()
        )?;
        match ts_to_rfc3339(self.meta.timestamp) {
            Some(ts) => write!(f, ", captured {ts}")?,
            None => write!(f, ", no timestamp")?,
        }
        for (idx, layer) in self.layers.iter().enumerate() {
            write!(f, "\n- Layer {} = {} {}", idx + 1, layer.name(), layer.info())?;
        }
        Ok(())
    }
}
