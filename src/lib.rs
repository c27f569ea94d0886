pub mod traits {
    pub mod byte_stream;
    pub mod frame_decoder;
    pub mod frame_encoder;
    pub mod stream_buffer;
}

pub mod models {

    pub mod frames {
        pub mod header;
        pub mod message;
    }
    pub mod decoders {
        pub mod item;
        pub mod secs;
    }
    pub mod encoders {
        pub mod secs;
    }
    pub mod streams {
        pub mod message_stream;
        pub mod reader;
        #[cfg(feature = "tcp")]
        pub mod tcp;
    }
    pub mod writers {
        pub mod frame_writer;
    }
    pub mod item;
}

pub mod constants;
pub mod enums;
pub mod error;
pub mod jis8;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use crate::enums::{MessageType, SecsFormat};
pub use crate::error::SecsError;
pub use crate::models::decoders::secs::SecsDecoder;
pub use crate::models::frames::header::MessageHeader;
pub use crate::models::frames::message::{HsmsFrame, SecsMessage};
pub use crate::models::item::Item;
