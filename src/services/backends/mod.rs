pub mod deepwiki;
