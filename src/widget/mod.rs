pub mod page_image;
