/// What a single line looks like with respect to code fences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceSig {
    Backticks,
    Tildes,
}

/// The character that opened the fence currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Fence signature of a line: its trimmed content starts with three or
    /// more backticks or tildes.
    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim();
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceSig::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceSig::Tildes)
        } else {
            None
        }
    }

    pub fn kind(sig: FenceSig) -> FenceKind {
        match sig {
            FenceSig::Backticks => FenceKind::Backticks,
            FenceSig::Tildes => FenceKind::Tildes,
        }
    }

    /// Only a fence made of the same character closes an open fence.
    pub fn closes(kind: FenceKind, sig: Option<FenceSig>) -> bool {
        matches!(
            (kind, sig),
            (FenceKind::Backticks, Some(FenceSig::Backticks))
                | (FenceKind::Tildes, Some(FenceSig::Tildes))
        )
    }
}

/// Result of feeding one line into a [`FenceState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceLine {
    /// The line opened a fence.
    Open(FenceKind),
    /// The line closed the open fence.
    Close(FenceKind),
    /// The line sits inside an open fence.
    Inside,
    /// Ordinary line outside any fence.
    Outside,
}

/// Line-by-line fenced code tracking: one flag plus the opening character.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceState {
    open: Option<FenceKind>,
}

impl FenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_kind(&self) -> Option<FenceKind> {
        self.open
    }

    /// Advances the state by one line and reports how the line was classified.
    pub fn feed(&mut self, line: &str) -> FenceLine {
        let sig = CodeFence::sig(line);
        match self.open {
            Some(kind) if CodeFence::closes(kind, sig) => {
                self.open = None;
                FenceLine::Close(kind)
            }
            Some(_) => FenceLine::Inside,
            None => match sig {
                Some(sig) => {
                    let kind = CodeFence::kind(sig);
                    self.open = Some(kind);
                    FenceLine::Open(kind)
                }
                None => FenceLine::Outside,
            },
        }
    }
}
