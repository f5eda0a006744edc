//! External interface shapes: the catalog read API's product document coming
//! in, and the cart write API's add-item request going out. Dynamic JSON is
//! normalized here, once; domain code never sees it.

pub mod cart;
pub mod catalog;

pub use cart::AddToCartRequest;
pub use catalog::CatalogProductDoc;
