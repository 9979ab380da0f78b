// Handlers module

pub mod create_thread;
pub mod health;
pub mod rejection;
pub mod stream_message;

pub use create_thread::create_thread_handler;
pub use health::health_handler;
pub use rejection::handle_rejection;
pub use stream_message::stream_message_handler;
