mod download;
mod operations;
mod pages;

pub use download::{download_file, download_page};
pub use operations::{add_page_numbers, add_pages, image_to_pdf, merge_pdf};
pub use pages::{form, health, index, not_found};
