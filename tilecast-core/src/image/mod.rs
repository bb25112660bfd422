//! Image layer: the decoder-collaborator seam and the coding-tile
//! representation it produces.

pub mod decode;
pub mod tile;

pub use decode::{ImageInfo, ScanType, TileDecoder};
pub use tile::CodingTile;
