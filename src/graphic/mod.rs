//! graphic: a small owned SVG tree used to assemble the table scene from
//! template assets.

pub mod asset;
pub mod error;
pub mod node;
pub mod selector;
mod xml;

pub use asset::{default_asset_root, default_image_dir, AssetStore};
pub use error::GraphicError;
pub use node::{Child, Node, ViewBox};
pub use selector::Selector;
