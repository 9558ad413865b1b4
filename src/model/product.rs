use rust_decimal::Decimal;

use crate::api::web::dto::ProductDto;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductModel {
    pub article_number: String,
    pub description: String,
    pub price: Decimal,
}

impl From<ProductDto> for ProductModel {
    fn from(value: ProductDto) -> Self {
        Self {
            article_number: value.article_number,
            description: value.description,
            price: value.price,
        }
    }
}

impl From<ProductModel> for ProductDto {
    fn from(value: ProductModel) -> Self {
        Self {
            article_number: value.article_number,
            description: value.description,
            price: value.price,
        }
    }
}
