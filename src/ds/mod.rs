pub mod top_k;

pub use top_k::TopK;
