//! Line-by-line stream transformation.
//!
//! A transformer reads one of the child's output pipes, rewrites every line
//! through a [`LineRewriter`] and writes it to the matching parent stream,
//! flushing after each line so output keeps the child's timing.

use crate::rules::{LineRewriter, error_chain};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;

/// Which child stream a transformer is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
	Stdout,
	Stderr,
}

impl StreamKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			StreamKind::Stdout => "stdout",
			StreamKind::Stderr => "stderr",
		}
	}
}

/// What a transformer did before its source ran dry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
	/// Lines written to the sink.
	pub lines: usize,

	/// Lines forwarded untransformed because rewriting failed.
	pub fallbacks: usize,
}

/// Split a raw line into its content and terminator (`\n`, `\r\n` or none).
fn split_terminator(raw: &[u8]) -> (&[u8], &[u8]) {
	if raw.ends_with(b"\r\n") {
		raw.split_at(raw.len() - 2)
	} else if raw.ends_with(b"\n") {
		raw.split_at(raw.len() - 1)
	} else {
		(raw, &[])
	}
}

async fn write_line<W>(sink: &mut W, line: &str, terminator: &[u8]) -> std::io::Result<()>
where
	W: AsyncWrite + Unpin,
{
	sink.write_all(line.as_bytes()).await?;
	sink.write_all(terminator).await?;
	sink.flush().await
}

/// Copy `source` to `sink` line by line, rewriting each line.
///
/// Never fails: undecodable bytes are replaced with U+FFFD, a line that
/// can't be rewritten is forwarded as-is, and an I/O error ends the loop
/// as if the stream had closed.
pub async fn transform_stream<R, W>(
	source: R,
	mut sink: W,
	rewriter: &LineRewriter,
	kind: StreamKind,
) -> TransformSummary
where
	R: AsyncRead + Unpin,
	W: AsyncWrite + Unpin,
{
	let mut reader = BufReader::new(source);
	let mut raw = Vec::new();
	let mut summary = TransformSummary::default();

	loop {
		raw.clear();
		match reader.read_until(b'\n', &mut raw).await {
			Ok(0) => break,
			Ok(_) => {}
			Err(err) => {
				tracing::warn!(stream = kind.as_str(), "reading child output failed: {err}");
				break;
			}
		}

		let (content, terminator) = split_terminator(&raw);
		let line = String::from_utf8_lossy(content);

		let output = match rewriter.rewrite(&line) {
			Ok(rewritten) => rewritten,
			Err(err) => {
				tracing::warn!(
					stream = kind.as_str(),
					"failed to theme line, passing it through: {}",
					error_chain(&err)
				);
				summary.fallbacks += 1;
				line.into_owned()
			}
		};

		if let Err(err) = write_line(&mut sink, &output, terminator).await {
			tracing::debug!(stream = kind.as_str(), "output closed: {err}");
			break;
		}
		summary.lines += 1;
	}

	tracing::trace!(
		stream = kind.as_str(),
		lines = summary.lines,
		fallbacks = summary.fallbacks,
		"stream finished"
	);
	summary
}

/// Run [`transform_stream`] on its own task.
pub fn spawn_transformer<R, W>(
	source: R,
	sink: W,
	rewriter: LineRewriter,
	kind: StreamKind,
) -> JoinHandle<TransformSummary>
where
	R: AsyncRead + Unpin + Send + 'static,
	W: AsyncWrite + Unpin + Send + 'static,
{
	tokio::spawn(async move { transform_stream(source, sink, &rewriter, kind).await })
}
