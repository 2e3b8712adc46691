//! States of the request head grammar.

/// Where inside a line terminator the parser is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eol {
    /// Expecting `\r`, or a bare `\n` when line endings are lenient.
    Cr,
    /// `\r` was seen, expecting `\n`.
    Lf,
}

/// What grammar comes next.
///
/// The request line runs straight through from [`State::Method`] to
/// [`State::RequestLineEnd`]. The header block then loops from
/// [`State::HeaderStart`] back to itself once per header line, until a bare
/// line terminator moves it through [`State::HeadEnd`] to [`State::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Method,
    MethodSp,
    Target,
    TargetSp,
    /// The `HTTP/` literal.
    VersionPrefix,
    VersionMajor,
    VersionDot,
    VersionMinor,
    RequestLineEnd(Eol),
    /// Either a header name or the bare terminator ending the block.
    HeaderStart,
    HeaderName,
    /// Whitespace after a header name; whatever follows, the line is refused.
    NameWhitespace,
    /// Optional whitespace between the colon and the value.
    Ows,
    Value,
    HeaderLineEnd(Eol),
    HeadEnd(Eol),
    Done,
}

impl State {
    pub fn is_done(self) -> bool {
        self == State::Done
    }

    /// True while the request line has not been recognized yet.
    pub fn in_request_line(self) -> bool {
        matches!(
            self,
            State::Method
                | State::MethodSp
                | State::Target
                | State::TargetSp
                | State::VersionPrefix
                | State::VersionMajor
                | State::VersionDot
                | State::VersionMinor
                | State::RequestLineEnd(_)
        )
    }

    /// The successor along the request line and a header line.
    ///
    /// Branching states ([`State::HeaderStart`], [`State::HeaderName`] and the
    /// line terminators) are decided by the parser from the byte it sees.
    pub(crate) fn next(self) -> State {
        match self {
            State::Method => State::MethodSp,
            State::MethodSp => State::Target,
            State::Target => State::TargetSp,
            State::TargetSp => State::VersionPrefix,
            State::VersionPrefix => State::VersionMajor,
            State::VersionMajor => State::VersionDot,
            State::VersionDot => State::VersionMinor,
            State::VersionMinor => State::RequestLineEnd(Eol::Cr),
            State::RequestLineEnd(_) => State::HeaderStart,
            State::HeaderStart => State::HeaderName,
            State::HeaderName => State::Ows,
            State::NameWhitespace => State::NameWhitespace,
            State::Ows => State::Value,
            State::Value => State::HeaderLineEnd(Eol::Cr),
            State::HeaderLineEnd(_) => State::HeaderStart,
            State::HeadEnd(_) | State::Done => State::Done,
        }
    }
}
