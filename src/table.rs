// Morse symbol table.
//
// The table is a binary tree of Morse prefixes flattened into an array.
// A run of symbols is encoded as a path code: start at 1, each dot
// doubles the code, each dash doubles it and adds one.  The table index
// is `code - 1`, so codes 1..=64 cover every entry.

use std::fmt;

/// Number of entries in the symbol table.
pub const TABLE_LEN: usize = 64;

/// Emitted for path codes with no assigned letter or digit.
pub const PLACEHOLDER: u8 = b'?';

/// Emitted for the empty path (a separator with no pending symbols).
pub const SPACE: u8 = b' ';

/// Largest path code with a table entry.
pub const MAX_PATH_CODE: u8 = TABLE_LEN as u8;

/// Longest run of symbols that can still be in range (`......`).
pub const MAX_RUN_LEN: u32 = 6;

static TABLE: [u8; TABLE_LEN] = *b" ETIANMSURWDKGOHVF?L?PJBXCYZQ??54?3???2???????16???????7???8?90?";

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

/// One of the two Morse marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Classify a byte. Anything other than `.` or `-` is a separator.
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'.' => Some(Self::Dot),
            b'-' => Some(Self::Dash),
            _ => None,
        }
    }

    #[inline]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Dot => b'.',
            Self::Dash => b'-',
        }
    }
}

// ---------------------------------------------------------------------------
// Path codes
// ---------------------------------------------------------------------------

/// A position in the Morse prefix tree that is guaranteed to have a
/// table entry.
///
/// Values are always in `1..=64`. The only way to grow a code is
/// [`PathCode::extend`], which refuses to leave that range, so a
/// `PathCode` can index the table without a further check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathCode(u8);

impl PathCode {
    /// The root of the tree: no symbols accumulated.
    pub const ROOT: Self = Self(1);

    /// Wrap a raw code, returning `None` outside `1..=64`.
    pub fn new(code: u32) -> Option<Self> {
        if (1..=u32::from(MAX_PATH_CODE)).contains(&code) {
            Some(Self(code as u8))
        } else {
            None
        }
    }

    /// Follow one more edge of the tree.
    ///
    /// Returns `None` when the resulting code would have no table entry.
    #[inline]
    pub fn extend(self, symbol: Symbol) -> Option<Self> {
        let next = u32::from(self.0) * 2 + u32::from(symbol == Symbol::Dash);
        Self::new(next)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Table index for this code.
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0) - 1
    }

    /// Number of symbols on the path from the root.
    #[inline]
    pub fn depth(self) -> u32 {
        7 - self.0.leading_zeros()
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    /// Symbols on the path from the root, first symbol first.
    pub fn symbols(self) -> impl Iterator<Item = Symbol> {
        let code = self.0;
        (0..self.depth()).rev().map(move |bit| {
            if code >> bit & 1 == 1 {
                Symbol::Dash
            } else {
                Symbol::Dot
            }
        })
    }
}

impl Default for PathCode {
    fn default() -> Self {
        Self::ROOT
    }
}

impl fmt::Display for PathCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.symbols() {
            write!(f, "{}", symbol.as_byte() as char)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Decoded byte for a path code.
#[inline]
pub fn lookup(code: PathCode) -> u8 {
    TABLE[code.index()]
}

/// The raw table, indexed by `code - 1`.
pub fn entries() -> &'static [u8; TABLE_LEN] {
    &TABLE
}

/// Path code of a table index, or `None` past the end of the table.
pub fn path_of(index: usize) -> Option<PathCode> {
    index
        .checked_add(1)
        .and_then(|code| u32::try_from(code).ok())
        .and_then(PathCode::new)
}

/// Whether the entry for `code` is a real letter or digit.
pub fn is_assigned(code: PathCode) -> bool {
    lookup(code).is_ascii_alphanumeric()
}
