//! Bytes written to the terminal.
//!
//! The editor repaints the whole line on every change: return to column
//! one, print prompt and buffer, erase whatever a previous longer line
//! left behind, return to column one and step forward to the cursor.
//! [`Output`] yields those bytes as slices without allocating.

#[derive(Debug, Copy, Clone)]
pub struct UintToBytes<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> UintToBytes<N> {
    pub(crate) fn from_uint<I: Into<usize>>(n: I) -> Option<Self> {
        let mut n: usize = n.into();

        if N >= 20 || n < 10_usize.pow(N as u32) {
            let mut bytes = [0; N];

            for i in (0..N).rev() {
                bytes[i] = 0x30 + (n % 10) as u8;
                n /= 10;

                if n == 0 {
                    break;
                }
            }

            Some(Self { bytes })
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        let start = self.bytes.iter().take_while(|&&b| b == 0).count();
        &self.bytes[start..]
    }
}

/// Enough digits for any `usize`.
pub(crate) const UINT_DIGITS: usize = 20;

#[derive(Debug)]
pub enum OutputItem<'a> {
    Slice(&'a [u8]),
    UintToBytes(UintToBytes<UINT_DIGITS>),
    /// The line is complete.
    Line,
    EndOfInput,
    Interrupted,
}

impl<'a> OutputItem<'a> {
    pub fn get_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Slice(slice) => Some(slice),
            Self::UintToBytes(uint) => Some(uint.as_bytes()),
            Self::Line | Self::EndOfInput | Self::Interrupted => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputAction {
    Nothing,
    Render,
    Submit,
    RenderAndSubmit,
    Interrupt,
    EndOfInput,
}

impl OutputAction {
    /// Action for a byte that produced `self` followed by `next`.
    pub fn then(self, next: OutputAction) -> OutputAction {
        match (self, next) {
            (OutputAction::Render, OutputAction::Nothing) => OutputAction::Render,
            (OutputAction::Render, OutputAction::Submit) => OutputAction::RenderAndSubmit,
            (_, next) => next,
        }
    }

    fn steps(self) -> &'static [Step] {
        match self {
            OutputAction::Nothing => &[],
            OutputAction::Render => &[Step::Render],
            OutputAction::Submit => &[Step::Newline, Step::Line],
            OutputAction::RenderAndSubmit => &[Step::Render, Step::Newline, Step::Line],
            OutputAction::Interrupt => &[Step::Render, Step::Caret, Step::Newline, Step::Interrupted],
            OutputAction::EndOfInput => &[Step::EndOfInput],
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum Step {
    Render,
    Caret,
    Newline,
    Line,
    EndOfInput,
    Interrupted,
}

#[derive(Debug, Copy, Clone)]
enum RenderState {
    CarriageReturn,
    Prompt,
    Buffer,
    EraseLine,
    Return,
    ForwardPrefix,
    Forward,
    ForwardFinalByte,
    Done,
}

pub struct Output<'a> {
    prompt: &'a [u8],
    buffer: &'a [u8],
    column: usize,
    steps: core::slice::Iter<'static, Step>,
    render: Option<RenderState>,
}

impl<'a> Output<'a> {
    /// `column` is the zero-based column the cursor ends up in after
    /// rendering.
    pub fn new(prompt: &'a [u8], buffer: &'a [u8], column: usize, action: OutputAction) -> Self {
        Self {
            prompt,
            buffer,
            column,
            steps: action.steps().iter(),
            render: None,
        }
    }

    fn advance_render(&mut self, state: RenderState) -> (RenderState, Option<OutputItem<'a>>) {
        match state {
            RenderState::CarriageReturn => (RenderState::Prompt, Some(OutputItem::Slice(b"\r"))),
            RenderState::Prompt => (RenderState::Buffer, Some(OutputItem::Slice(self.prompt))),
            RenderState::Buffer => (RenderState::EraseLine, Some(OutputItem::Slice(self.buffer))),
            RenderState::EraseLine => (RenderState::Return, Some(OutputItem::Slice(b"\x1b[0K"))),
            RenderState::Return => {
                let next = if self.column > 0 {
                    RenderState::ForwardPrefix
                } else {
                    RenderState::Done
                };

                (next, Some(OutputItem::Slice(b"\r")))
            }
            RenderState::ForwardPrefix => (RenderState::Forward, Some(OutputItem::Slice(b"\x1b["))),
            RenderState::Forward => (
                RenderState::ForwardFinalByte,
                UintToBytes::from_uint(self.column).map(OutputItem::UintToBytes),
            ),
            RenderState::ForwardFinalByte => (RenderState::Done, Some(OutputItem::Slice(b"C"))),
            RenderState::Done => (RenderState::Done, None),
        }
    }
}

impl<'a> Iterator for Output<'a> {
    type Item = OutputItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(state) = self.render.take() {
                let (next, item) = self.advance_render(state);

                if let Some(item) = item {
                    self.render = Some(next);
                    break Some(item);
                }

                continue;
            }

            match self.steps.next()? {
                Step::Render => self.render = Some(RenderState::CarriageReturn),
                Step::Caret => break Some(OutputItem::Slice(b"^C")),
                Step::Newline => break Some(OutputItem::Slice(b"\r\n")),
                Step::Line => break Some(OutputItem::Line),
                Step::EndOfInput => break Some(OutputItem::EndOfInput),
                Step::Interrupted => break Some(OutputItem::Interrupted),
            }
        }
    }
}
