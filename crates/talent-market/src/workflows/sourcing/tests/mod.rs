mod cache;
mod common;
mod service;
