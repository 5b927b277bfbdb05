//! Records formatted `tracing` output for assertions.

use std::{
	io,
	sync::{Arc, Mutex},
};
use tracing::Level;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Runs `f` with a subscriber that records every event and span field, and returns the output.
pub(crate) fn captured_logs(f: impl FnOnce()) -> String {
	let buffer = Buffer::default();
	let writer = buffer.clone();
	let subscriber = tracing_subscriber::fmt()
		.with_writer(move || writer.clone())
		.with_max_level(Level::TRACE)
		.finish();
	tracing::subscriber::with_default(subscriber, f);

	let output = buffer.0.lock().unwrap().clone();
	String::from_utf8_lossy(&output).into_owned()
}
