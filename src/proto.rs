//! Protobuf wire messages exchanged during a group call.
//!
//! The schema is owned by the protocol definition and consumed as given;
//! messages are hand-written `prost` types so no build-time codegen is
//! needed. Field numbers are part of the wire contract and must not change.

/// A protocol-level media key disclosure: one PCMK plus its version pair.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MediaKey {
    #[prost(uint32, tag = "1")]
    pub epoch: u32,
    #[prost(uint32, tag = "2")]
    pub ratchet_counter: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub pcmk: ::prost::alloc::vec::Vec<u8>,
}

/// Handshake messages (Hello and Auth phases).
pub mod handshake {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Hello {
        #[prost(string, tag = "1")]
        pub identity: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub nickname: ::prost::alloc::string::String,
        /// Ephemeral participant call key (public half).
        #[prost(bytes = "vec", tag = "3")]
        pub pck: ::prost::alloc::vec::Vec<u8>,
        /// Participant call cookie (nonce salt).
        #[prost(bytes = "vec", tag = "4")]
        pub pcck: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct HelloEnvelope {
        #[prost(bytes = "vec", tag = "1")]
        pub padding: ::prost::alloc::vec::Vec<u8>,
        #[prost(oneof = "hello_envelope::Content", tags = "2, 3")]
        pub content: ::core::option::Option<hello_envelope::Content>,
    }

    pub mod hello_envelope {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Content {
            #[prost(message, tag = "2")]
            Hello(super::Hello),
            /// Recognized but unsupported.
            #[prost(message, tag = "3")]
            GuestHello(super::Hello),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Auth {
        /// The receiver's own pck, echoed back for verification.
        #[prost(bytes = "vec", tag = "1")]
        pub pck: ::prost::alloc::vec::Vec<u8>,
        /// The receiver's own pcck, echoed back for verification.
        #[prost(bytes = "vec", tag = "2")]
        pub pcck: ::prost::alloc::vec::Vec<u8>,
        /// Media keys currently in use by the sender.
        #[prost(message, repeated, tag = "3")]
        pub media_keys: ::prost::alloc::vec::Vec<super::MediaKey>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct AuthEnvelope {
        #[prost(bytes = "vec", tag = "1")]
        pub padding: ::prost::alloc::vec::Vec<u8>,
        #[prost(oneof = "auth_envelope::Content", tags = "2, 3")]
        pub content: ::core::option::Option<auth_envelope::Content>,
    }

    pub mod auth_envelope {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Content {
            #[prost(message, tag = "2")]
            Auth(super::Auth),
            /// Recognized but unsupported.
            #[prost(message, tag = "3")]
            GuestAuth(super::Auth),
        }
    }
}

/// Post-handshake participant-to-participant messages.
pub mod participant_to_participant {
    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct Unit {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CaptureDevice {
        #[prost(oneof = "capture_device::State", tags = "1, 2")]
        pub state: ::core::option::Option<capture_device::State>,
    }

    pub mod capture_device {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum State {
            #[prost(message, tag = "1")]
            On(super::Unit),
            #[prost(message, tag = "2")]
            Off(super::Unit),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CaptureState {
        #[prost(oneof = "capture_state::Device", tags = "1, 2")]
        pub device: ::core::option::Option<capture_state::Device>,
    }

    pub mod capture_state {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Device {
            #[prost(message, tag = "1")]
            Microphone(super::CaptureDevice),
            #[prost(message, tag = "2")]
            Camera(super::CaptureDevice),
        }
    }

    #[derive(Clone, Copy, PartialEq, ::prost::Message)]
    pub struct HoldState {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Envelope {
        #[prost(bytes = "vec", tag = "1")]
        pub padding: ::prost::alloc::vec::Vec<u8>,
        #[prost(oneof = "envelope::Content", tags = "2, 3, 4, 5")]
        pub content: ::core::option::Option<envelope::Content>,
    }

    pub mod envelope {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Content {
            #[prost(message, tag = "2")]
            CaptureState(super::CaptureState),
            #[prost(message, tag = "3")]
            Rekey(super::super::MediaKey),
            /// Recognized but unsupported; dropped on receipt.
            #[prost(bytes = "vec", tag = "4")]
            EncryptedAdminEnvelope(::prost::alloc::vec::Vec<u8>),
            /// Recognized but unsupported; dropped on receipt.
            #[prost(message, tag = "5")]
            HoldState(super::HoldState),
        }
    }

    /// The routing wrapper carried over the P2P data channel.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct OuterEnvelope {
        #[prost(uint32, tag = "1")]
        pub sender: u32,
        #[prost(uint32, tag = "2")]
        pub receiver: u32,
        #[prost(bytes = "vec", tag = "3")]
        pub encrypted_data: ::prost::alloc::vec::Vec<u8>,
    }
}

/// Requests addressed to the SFU (plaintext routing, no media content).
pub mod participant_to_sfu {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum MediaKind {
        Unspecified = 0,
        Audio = 1,
        Video = 2,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SubscribeParticipantMedia {
        #[prost(uint32, tag = "1")]
        pub participant_id: u32,
        #[prost(enumeration = "MediaKind", tag = "2")]
        pub media: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UnsubscribeParticipantMedia {
        #[prost(uint32, tag = "1")]
        pub participant_id: u32,
        #[prost(enumeration = "MediaKind", tag = "2")]
        pub media: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Envelope {
        #[prost(oneof = "envelope::Content", tags = "1, 2")]
        pub content: ::core::option::Option<envelope::Content>,
    }

    pub mod envelope {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Content {
            #[prost(message, tag = "1")]
            Subscribe(super::SubscribeParticipantMedia),
            #[prost(message, tag = "2")]
            Unsubscribe(super::UnsubscribeParticipantMedia),
        }
    }
}
