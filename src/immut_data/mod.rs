pub mod consts;
pub mod dynamic;
