pub mod document_processing;
