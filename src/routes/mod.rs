pub mod api_doc;
pub mod health;
pub mod ocr;
