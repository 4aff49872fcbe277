// Module naming follows project convention (SPSC = Single-Producer Single-Consumer)
#[allow(non_snake_case)]
pub mod SPSC {
    mod builder;
    mod consumer;
    mod producer;

    pub use builder::FifoBuilder;
    pub use consumer::Consumer;
    pub use producer::Producer;

    pub mod Buffer {
        pub mod Buffer;
        pub mod Buffer_impl;
        pub mod gray;
        pub use Buffer::GrayFifo; // re-export for stable path
    }
    pub mod Structs {
        pub mod Buffer_Structs;
        pub use Buffer_Structs::DomainRegs; // re-export for stable path
    }
}
