mod manage_order;
mod product_lookup;

pub use manage_order::{
    CreateOrderUseCase, DiscardOrderUseCase, EditOrderUseCase, ListOrderUseCase,
};
pub use product_lookup::ProductLookupUseCase;
