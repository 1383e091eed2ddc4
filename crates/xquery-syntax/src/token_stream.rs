//! Token stream with a dynamic set of visible channels.
//!
//! The lexer routes trivia (whitespace, comments) to side channels. The parser
//! normally sees only the default channel, but some constructs need the trivia
//! back. Enabling a channel rewinds the cursor over the trivia that was skipped
//! on the way to the current token, so the next lookahead sees it.

use thiserror::Error;

/// Token type of the end-of-stream token
pub const EOF: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u32);

impl Channel {
    pub const DEFAULT: Channel = Channel(0);
    pub const HIDDEN: Channel = Channel(1);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: i32,
    pub text: String,
    pub channel: Channel,
    pub line: u32,
    pub column: u32,
    /// Position in the stream buffer, assigned when the token is buffered
    pub index: usize,
}

impl Token {
    pub fn new(token_type: i32, text: impl Into<String>, channel: Channel) -> Self {
        Self {
            token_type,
            text: text.into(),
            channel,
            line: 0,
            column: 0,
            index: 0,
        }
    }

    pub fn eof() -> Self {
        Self::new(EOF, "<EOF>", Channel::DEFAULT)
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == EOF
    }
}

/// The set of channels visible to the consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSet(Vec<Channel>);

impl Default for ChannelSet {
    fn default() -> Self {
        Self(vec![Channel::DEFAULT])
    }
}

impl ChannelSet {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        let mut set = Self(Vec::new());
        for channel in channels {
            set.insert(channel);
        }
        set
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.0.contains(&channel)
    }

    /// Returns false when the channel was already present
    pub fn insert(&mut self, channel: Channel) -> bool {
        if self.contains(channel) {
            return false;
        }
        self.0.push(channel);
        true
    }

    pub fn remove(&mut self, channel: Channel) -> bool {
        let before = self.0.len();
        self.0.retain(|c| *c != channel);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = Channel> + '_ {
        self.0.iter().copied()
    }
}

pub trait TokenSource {
    /// Next token, or an EOF token once the input is exhausted
    fn next_token(&mut self) -> Token;
}

/// Token source over a prepared token list
pub struct VecTokenSource {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
}

impl VecTokenSource {
    pub fn new(tokens: Vec<Token>) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.is_eof() => last.clone(),
            Some(last) => Token::eof().at(last.line, last.column + last.text.chars().count() as u32),
            None => Token::eof().at(1, 0),
        };
        Self {
            tokens: tokens.into_iter(),
            eof,
        }
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenStreamError {
    #[error("cannot consume EOF")]
    ConsumeEof,
}

/// Cursor position after `enabled` was added to `channels`.
///
/// Walks back from `cursor` over tokens that are on `enabled` or on no active
/// channel, stopping after the previous token that stays visible.
pub fn rewind_index(tokens: &[Token], cursor: usize, channels: &ChannelSet, enabled: Channel) -> usize {
    let mut i = cursor.min(tokens.len());
    while i > 0 {
        let token = &tokens[i - 1];
        if token.channel == enabled || !channels.contains(token.channel) {
            i -= 1;
        } else {
            break;
        }
    }
    i
}

pub struct MultiChannelTokenStream<S> {
    source: S,
    tokens: Vec<Token>,
    cursor: Option<usize>,
    fetched_eof: bool,
    channels: ChannelSet,
}

impl<S: TokenSource> MultiChannelTokenStream<S> {
    pub fn new(source: S) -> Self {
        Self::with_channels(source, ChannelSet::default())
    }

    pub fn with_channels(source: S, channels: ChannelSet) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            cursor: None,
            fetched_eof: false,
            channels,
        }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Cursor position, or `None` before the first lookup
    pub fn index(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of buffered tokens
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    pub fn get(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn enable(&mut self, channel: Channel) {
        if !self.channels.insert(channel) {
            return;
        }
        if let Some(cursor) = self.cursor {
            self.cursor = Some(rewind_index(&self.tokens, cursor, &self.channels, channel));
        }
    }

    pub fn disable(&mut self, channel: Channel) {
        self.channels.remove(channel);
    }

    /// Token `k` positions ahead on the active channels, `lt(1)` being the
    /// current token.
    pub fn lt(&mut self, k: usize) -> Option<&Token> {
        let mut i = self.lazy_init();
        if k == 0 {
            return None;
        }
        for _ in 1..k {
            if self.sync(i + 1) {
                i = self.next_on_channel(i + 1);
            }
        }
        self.tokens.get(i)
    }

    /// Token `k` positions behind the cursor on the active channels.
    pub fn lb(&mut self, k: usize) -> Option<&Token> {
        let mut i = self.lazy_init();
        if k == 0 || k > i {
            return None;
        }
        for _ in 0..k {
            i = self.previous_on_channel(i.checked_sub(1)?)?;
        }
        self.tokens.get(i)
    }

    pub fn la(&mut self, k: usize) -> Option<i32> {
        self.lt(k).map(|token| token.token_type)
    }

    pub fn consume(&mut self) -> Result<(), TokenStreamError> {
        let cursor = self.lazy_init();
        if self.tokens.get(cursor).is_some_and(Token::is_eof) {
            return Err(TokenStreamError::ConsumeEof);
        }
        if self.sync(cursor + 1) {
            let next = self.next_on_channel(cursor + 1);
            self.cursor = Some(next);
        }
        Ok(())
    }

    /// Move the cursor to the first visible token at or after `index`.
    pub fn seek(&mut self, index: usize) {
        self.lazy_init();
        let next = self.next_on_channel(index);
        self.cursor = Some(next);
    }

    /// Buffer every remaining token of the source.
    pub fn fill(&mut self) {
        while !self.fetched_eof {
            self.fetch(1000);
        }
    }

    /// Count of buffered tokens on the active channels, after filling the buffer.
    pub fn number_of_on_channel_tokens(&mut self) -> usize {
        self.fill();
        let mut count = 0;
        for token in &self.tokens {
            if self.channels.contains(token.channel) {
                count += 1;
            }
            if token.is_eof() {
                break;
            }
        }
        count
    }

    fn lazy_init(&mut self) -> usize {
        match self.cursor {
            Some(cursor) => cursor,
            None => {
                self.sync(0);
                let cursor = self.next_on_channel(0);
                self.cursor = Some(cursor);
                cursor
            }
        }
    }

    /// Make sure index `i` is buffered. False when the source ended first.
    fn sync(&mut self, i: usize) -> bool {
        if i < self.tokens.len() {
            return true;
        }
        let needed = i + 1 - self.tokens.len();
        self.fetch(needed) >= needed
    }

    fn fetch(&mut self, n: usize) -> usize {
        if self.fetched_eof {
            return 0;
        }
        for fetched in 0..n {
            let mut token = self.source.next_token();
            token.index = self.tokens.len();
            let eof = token.is_eof();
            self.tokens.push(token);
            if eof {
                self.fetched_eof = true;
                return fetched + 1;
            }
        }
        n
    }

    fn is_visible(&self, token: &Token) -> bool {
        token.is_eof() || self.channels.contains(token.channel)
    }

    fn next_on_channel(&mut self, mut i: usize) -> usize {
        self.sync(i);
        loop {
            let Some(token) = self.tokens.get(i) else {
                return self.tokens.len().saturating_sub(1);
            };
            if self.is_visible(token) {
                return i;
            }
            i += 1;
            self.sync(i);
        }
    }

    fn previous_on_channel(&mut self, i: usize) -> Option<usize> {
        self.sync(i);
        let last = self.tokens.len().checked_sub(1)?;
        (0..=i.min(last)).rev().find(|&j| self.is_visible(&self.tokens[j]))
    }
}
