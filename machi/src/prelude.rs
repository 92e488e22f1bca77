pub use crate::client::{
    CompletionClient, EmbeddingsClient, ProviderClient, TranscriptionClient, VerifyClient,
    VerifyError,
};

#[cfg(feature = "image")]
pub use crate::client::ImageGenerationClient;

#[cfg(feature = "audio")]
pub use crate::client::AudioGenerationClient;
