pub mod href;
