pub mod plain;

pub use plain::PlainLoginProvider;
