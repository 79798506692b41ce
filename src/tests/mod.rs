pub mod common;

mod directory_loading;
