//! Contains the common [`ErrorKind`] trait used by every error in the workspace, and the
//! span-carrying [`Error`] type that wraps it.
//!
//! Parse errors point into the source text. Errors raised while differentiating or evaluating a
//! tree have no source position, and are created with an empty span list; their reports contain
//! only the message and help text.

// lets `#[derive(ErrorKind)]` refer to `::deriv_error` inside this crate's own tests
extern crate self as deriv_error;

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display}, io, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
///
/// This trait is usually implemented with `#[derive(ErrorKind)]` from `deriv-attrs`.
pub trait ErrorKind: Debug + Send + Sync {
    /// Returns `self` as [`Any`], so that callers can downcast to the concrete error kind.
    fn as_any(&self) -> &dyn Any;

    /// The headline message of the error, without any source context.
    fn message(&self) -> String;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from. Empty if the error did not
    /// originate from source code.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Creates a new error that is not tied to any region of source code.
    pub fn detached(kind: impl ErrorKind + 'static) -> Self {
        Self::new(Vec::new(), kind)
    }

    /// The byte offset into the source where the error starts, if it has one.
    pub fn position(&self) -> Option<usize> {
        self.spans.first().map(|span| span.start)
    }

    /// Returns the error kind as `T`, if it is one.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Returns true if the error kind is a `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Report this error to stderr, highlighting the given source.
    ///
    /// The `ariadne` crate's [`Report`] type does not implement [`Display`], so the report can
    /// only be written through its `eprint` method.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(input)))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position() {
            Some(position) => write!(f, "{} (at position {})", self.kind.message(), position),
            None => write!(f, "{}", self.kind.message()),
        }
    }
}

impl std::error::Error for Error {}
