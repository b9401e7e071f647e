use super::style::{Run, RunStyle, TextAlignment};

/// Byte index of the `char_index`-th character, or the string length.
pub(crate) fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(index, _)| index)
}

/// A block of styled runs sharing one alignment and left margin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: TextAlignment,
    pub margin: f64,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str, style: RunStyle) -> Self {
        let mut paragraph = Self::new();
        paragraph.insert_text(0, text, style);
        paragraph
    }

    pub fn from_runs(runs: Vec<Run>) -> Self {
        let mut paragraph = Self {
            runs,
            ..Self::default()
        };
        paragraph.normalize();
        paragraph
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    /// Text between two char offsets of this paragraph.
    pub fn text_between(&self, start: usize, end: usize) -> String {
        self.text().chars().skip(start).take(end.saturating_sub(start)).collect()
    }

    /// Style of the character at `offset`.
    pub fn style_at(&self, offset: usize) -> Option<&RunStyle> {
        let mut position = 0;
        for run in &self.runs {
            let len = run.char_len();
            if offset < position + len {
                return Some(&run.style);
            }
            position += len;
        }
        None
    }

    /// Style new text typed at `offset` inherits: the preceding character's,
    /// else the following one's.
    pub fn insertion_style(&self, offset: usize) -> Option<&RunStyle> {
        if offset > 0 {
            if let Some(style) = self.style_at(offset - 1) {
                return Some(style);
            }
        }
        self.style_at(offset)
    }

    /// Makes sure a run starts at `offset` and returns that run's index.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut position = 0;
        for index in 0..self.runs.len() {
            if offset == position {
                return index;
            }
            let len = self.runs[index].char_len();
            if offset < position + len {
                let at = byte_index(&self.runs[index].text, offset - position);
                let tail = self.runs[index].text.split_off(at);
                let style = self.runs[index].style.clone();
                self.runs.insert(index + 1, Run::new(tail, style));
                return index + 1;
            }
            position += len;
        }
        self.runs.len()
    }

    pub fn insert_text(&mut self, offset: usize, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        let index = self.split_at(offset);
        self.runs.insert(index, Run::new(text, style));
        self.normalize();
    }

    pub fn delete(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.drain(first..last);
        self.normalize();
    }

    /// Removes and returns every run after `offset`.
    pub fn split_off(&mut self, offset: usize) -> Vec<Run> {
        let index = self.split_at(offset);
        let tail = self.runs.split_off(index);
        self.normalize();
        tail
    }

    pub fn append_runs(&mut self, runs: Vec<Run>) {
        self.runs.extend(runs);
        self.normalize();
    }

    /// Applies `update` to the style of every character in `start..end`.
    pub fn restyle(&mut self, start: usize, end: usize, mut update: impl FnMut(&mut RunStyle)) {
        if start >= end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            update(&mut run.style);
        }
        self.normalize();
    }

    /// Rewrites each run's text in place, keeping run boundaries.
    pub fn map_run_text(&mut self, mut transform: impl FnMut(&str) -> String) {
        for run in &mut self.runs {
            run.text = transform(&run.text);
        }
        self.runs.retain(|run| !run.text.is_empty());
    }

    /// Drops empty runs and merges neighbours with identical styles.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(previous) if previous.style == run.style => previous.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
