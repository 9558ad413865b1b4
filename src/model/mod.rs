mod order;
mod product;

pub use order::OrderModel;
pub use product::ProductModel;
