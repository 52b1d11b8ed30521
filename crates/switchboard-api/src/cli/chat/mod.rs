//! Interactive terminal chat.
//!
//! Every line goes through the same router as the HTTP API, so in-band
//! commands (`!help`, `!forget`, ...) work here too. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod input;
pub mod loop_runner;
