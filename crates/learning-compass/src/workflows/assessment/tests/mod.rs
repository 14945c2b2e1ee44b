mod collector;
mod common;
mod routing;
