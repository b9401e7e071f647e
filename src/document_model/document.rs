use super::paragraph::Paragraph;
use super::selection::TextRange;
use super::style::{snap_length, MarkerStyle, RunStyle, TextAlignment};
use crate::error::{EditorError, Result};

/// Terminator placed after every paragraph in the logical text stream.
pub const PARAGRAPH_TERMINATOR: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

/// Where a block lives: the document body or a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Root,
    Item(ItemId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub marker_style: MarkerStyle,
    pub marker_offset: f64,
    pub padding: f64,
    items: Vec<ItemId>,
}

impl List {
    pub fn new(marker_style: MarkerStyle) -> Self {
        Self {
            marker_style,
            marker_offset: 0.0,
            padding: 0.0,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    List(List),
}

#[derive(Debug, Clone)]
struct BlockSlot {
    block: Block,
    parent: Container,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    blocks: Vec<BlockId>,
    list: BlockId,
}

impl ListItem {
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn list(&self) -> BlockId {
        self.list
    }
}

/// A paragraph's place in the logical text stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParagraphSpan {
    pub id: BlockId,
    pub start: usize,
    pub len: usize,
}

impl ParagraphSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Structured note content.
///
/// Blocks and list items live in arenas addressed by [`BlockId`] and
/// [`ItemId`]; structure is kept as parent links plus ordered child vectors
/// so sibling walks never need live object pointers.
///
/// # Invariants
/// - A list always has at least one item and an item at least one block;
///   removals cascade upward.
/// - Every mutation bumps [`Document::revision`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Vec<Option<BlockSlot>>,
    items: Vec<Option<ListItem>>,
    root: Vec<BlockId>,
    revision: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports unstyled text, one paragraph per line.
    pub fn from_plain_text(text: &str) -> Self {
        let mut document = Self::new();
        for line in normalize_newlines(text).split(PARAGRAPH_TERMINATOR) {
            document.push_paragraph(Paragraph::with_text(line, RunStyle::default()));
        }
        document
    }

    /// Imports text verbatim. Paragraphs break at `\n` only, so carriage
    /// returns stay in the runs and [`Document::text`] gives back `text`.
    pub fn from_raw_text(text: &str) -> Self {
        let mut document = Self::new();
        for line in text.split(PARAGRAPH_TERMINATOR) {
            document.push_paragraph(Paragraph::with_text(line, RunStyle::default()));
        }
        document
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn root_blocks(&self) -> &[BlockId] {
        &self.root
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)?.as_ref().map(|slot| &slot.block)
    }

    fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)?.as_mut().map(|slot| &mut slot.block)
    }

    pub fn paragraph(&self, id: BlockId) -> Option<&Paragraph> {
        match self.block(id)? {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::List(_) => None,
        }
    }

    pub(crate) fn paragraph_mut(&mut self, id: BlockId) -> Option<&mut Paragraph> {
        self.touch();
        match self.block_mut(id)? {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::List(_) => None,
        }
    }

    pub fn list(&self, id: BlockId) -> Option<&List> {
        match self.block(id)? {
            Block::List(list) => Some(list),
            Block::Paragraph(_) => None,
        }
    }

    fn list_mut(&mut self, id: BlockId) -> Option<&mut List> {
        match self.block_mut(id)? {
            Block::List(list) => Some(list),
            Block::Paragraph(_) => None,
        }
    }

    pub fn list_item(&self, id: ItemId) -> Option<&ListItem> {
        self.items.get(id.0)?.as_ref()
    }

    pub fn parent_of(&self, id: BlockId) -> Option<Container> {
        self.blocks.get(id.0)?.as_ref().map(|slot| slot.parent)
    }

    pub fn children(&self, container: Container) -> &[BlockId] {
        match container {
            Container::Root => &self.root,
            Container::Item(item) => self
                .list_item(item)
                .map_or(&[][..], |item| item.blocks.as_slice()),
        }
    }

    fn children_mut(&mut self, container: Container) -> Option<&mut Vec<BlockId>> {
        match container {
            Container::Root => Some(&mut self.root),
            Container::Item(item) => self
                .items
                .get_mut(item.0)?
                .as_mut()
                .map(|item| &mut item.blocks),
        }
    }

    /// Container and index of a block.
    pub fn position_of(&self, id: BlockId) -> Option<(Container, usize)> {
        let container = self.parent_of(id)?;
        let index = self.children(container).iter().position(|&child| child == id)?;
        Some((container, index))
    }

    /// The following block in the same container.
    pub fn next_block(&self, id: BlockId) -> Option<BlockId> {
        let (container, index) = self.position_of(id)?;
        self.children(container).get(index + 1).copied()
    }

    /// The following item of the same list.
    pub fn next_list_item(&self, id: ItemId) -> Option<ItemId> {
        let list = self.list(self.list_item(id)?.list)?;
        let index = list.items.iter().position(|&item| item == id)?;
        list.items.get(index + 1).copied()
    }

    // ---- construction ----

    pub fn add_block(&mut self, container: Container, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Some(BlockSlot {
            block,
            parent: container,
        }));
        if let Some(children) = self.children_mut(container) {
            children.push(id);
        }
        self.touch();
        id
    }

    /// Appends an empty item to `list`; fill it before handing the
    /// document out.
    pub fn add_item(&mut self, list: BlockId) -> Option<ItemId> {
        self.list(list)?;
        let id = ItemId(self.items.len());
        self.items.push(Some(ListItem {
            blocks: Vec::new(),
            list,
        }));
        self.list_mut(list)?.items.push(id);
        self.touch();
        Some(id)
    }

    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> BlockId {
        self.add_block(Container::Root, Block::Paragraph(paragraph))
    }

    /// Appends a list with one item per paragraph to the document body.
    /// Nothing is added when `paragraphs` is empty.
    pub fn push_list(
        &mut self,
        marker_style: MarkerStyle,
        paragraphs: Vec<Paragraph>,
    ) -> Option<BlockId> {
        if paragraphs.is_empty() {
            return None;
        }
        let list = self.add_block(Container::Root, Block::List(List::new(marker_style)));
        for paragraph in paragraphs {
            if let Some(item) = self.add_item(list) {
                self.add_block(Container::Item(item), Block::Paragraph(paragraph));
            }
        }
        Some(list)
    }

    /// Removes every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.items.clear();
        self.root.clear();
        self.touch();
    }

    // ---- structural primitives ----

    fn detach(&mut self, id: BlockId) -> Option<(Container, usize)> {
        let (container, index) = self.position_of(id)?;
        self.children_mut(container)?.remove(index);
        Some((container, index))
    }

    fn attach(&mut self, id: BlockId, container: Container, index: usize) {
        if let Some(children) = self.children_mut(container) {
            let index = index.min(children.len());
            children.insert(index, id);
        }
        if let Some(slot) = self.blocks.get_mut(id.0).and_then(Option::as_mut) {
            slot.parent = container;
        }
    }

    fn release(&mut self, id: BlockId) {
        let Some(slot) = self.blocks.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        if let Block::List(list) = slot.block {
            for item in list.items {
                self.release_item(item);
            }
        }
    }

    fn release_item(&mut self, id: ItemId) {
        if let Some(item) = self.items.get_mut(id.0).and_then(Option::take) {
            for block in item.blocks {
                self.release(block);
            }
        }
    }

    /// Removes items and lists left empty, walking up from `container`.
    fn prune(&mut self, container: Container) {
        let mut container = container;
        while let Container::Item(item_id) = container {
            let Some(item) = self.list_item(item_id) else {
                return;
            };
            if !item.blocks.is_empty() {
                return;
            }
            let list_id = item.list;
            self.release_item(item_id);
            let Some(list) = self.list_mut(list_id) else {
                return;
            };
            list.items.retain(|&item| item != item_id);
            if !list.items.is_empty() {
                return;
            }
            match self.detach(list_id) {
                Some((parent, _)) => {
                    self.release(list_id);
                    container = parent;
                }
                None => return,
            }
        }
    }

    /// Drops items without blocks and lists without items.
    pub(crate) fn prune_empty(&mut self) {
        for index in 0..self.items.len() {
            let id = ItemId(index);
            if self.list_item(id).is_some_and(|item| item.blocks.is_empty()) {
                self.prune(Container::Item(id));
            }
        }
        for index in 0..self.blocks.len() {
            let id = BlockId(index);
            if self.list(id).is_some_and(|list| list.items.is_empty()) {
                if let Some((container, _)) = self.detach(id) {
                    self.release(id);
                    self.prune(container);
                }
            }
        }
    }

    fn remove_block(&mut self, id: BlockId) {
        if let Some((container, _)) = self.detach(id) {
            self.release(id);
            self.prune(container);
            self.touch();
        }
    }

    // ---- text stream ----

    /// Paragraphs in depth-first document order.
    pub fn paragraph_ids(&self) -> Vec<BlockId> {
        let mut out = Vec::new();
        self.collect_paragraphs(&self.root, &mut out);
        out
    }

    fn collect_paragraphs(&self, ids: &[BlockId], out: &mut Vec<BlockId>) {
        for &id in ids {
            match self.block(id) {
                Some(Block::Paragraph(_)) => out.push(id),
                Some(Block::List(list)) => {
                    for &item in &list.items {
                        if let Some(item) = self.list_item(item) {
                            self.collect_paragraphs(&item.blocks, out);
                        }
                    }
                }
                None => {}
            }
        }
    }

    pub fn spans(&self) -> Vec<ParagraphSpan> {
        let mut start = 0;
        self.paragraph_ids()
            .into_iter()
            .filter_map(|id| {
                let len = self.paragraph(id)?.char_len();
                let span = ParagraphSpan { id, start, len };
                start += len + 1;
                Some(span)
            })
            .collect()
    }

    /// Length of the text stream without the final terminator.
    pub fn len(&self) -> usize {
        self.spans().last().map_or(0, ParagraphSpan::end)
    }

    /// Every paragraph followed by its terminator, the last one included.
    pub fn full_text(&self) -> String {
        let mut text = String::new();
        for id in self.paragraph_ids() {
            if let Some(paragraph) = self.paragraph(id) {
                text.push_str(&paragraph.text());
                text.push(PARAGRAPH_TERMINATOR);
            }
        }
        text
    }

    /// The document's plain text.
    pub fn text(&self) -> String {
        let mut text = self.full_text();
        if text.ends_with(PARAGRAPH_TERMINATOR) {
            text.pop();
        }
        text
    }

    pub fn check_range(&self, range: TextRange) -> Result<()> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(EditorError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    pub fn plain_text(&self, range: TextRange) -> Result<String> {
        self.check_range(range)?;
        Ok(self
            .text()
            .chars()
            .skip(range.start)
            .take(range.len())
            .collect())
    }

    /// Paragraph and offset addressed by `position`; `None` only for a
    /// document without paragraphs.
    pub fn paragraph_at(&self, position: usize) -> Result<Option<(BlockId, usize)>> {
        self.check_range(TextRange::caret(position))?;
        Ok(self
            .spans()
            .into_iter()
            .find(|span| span.start <= position && position <= span.end())
            .map(|span| (span.id, position - span.start)))
    }

    /// Content span of the paragraph holding `position`, terminator excluded.
    pub fn line_range_at(&self, position: usize) -> Result<TextRange> {
        self.check_range(TextRange::caret(position))?;
        Ok(self
            .spans()
            .into_iter()
            .find(|span| span.start <= position && position <= span.end())
            .map_or(TextRange::caret(0), |span| TextRange::new(span.start, span.end())))
    }

    /// Style of the character at `position`, falling back to the one before.
    pub fn style_at(&self, position: usize) -> RunStyle {
        let Ok(Some((id, offset))) = self.paragraph_at(position) else {
            return RunStyle::default();
        };
        self.paragraph(id)
            .and_then(|paragraph| {
                paragraph
                    .style_at(offset)
                    .or_else(|| paragraph.insertion_style(offset))
            })
            .cloned()
            .unwrap_or_default()
    }

    fn replacement_style(&self, range: TextRange) -> RunStyle {
        if !range.is_empty() {
            return self.style_at(range.start);
        }
        let Ok(Some((id, offset))) = self.paragraph_at(range.start) else {
            return RunStyle::default();
        };
        self.paragraph(id)
            .and_then(|paragraph| paragraph.insertion_style(offset))
            .cloned()
            .unwrap_or_default()
    }

    // ---- editing primitives ----

    /// Replaces the text in `range` and returns the span of the inserted
    /// text. The new text takes the style found at the range start.
    pub fn replace(&mut self, range: TextRange, text: &str) -> Result<TextRange> {
        self.check_range(range)?;
        let text = normalize_newlines(text);
        let style = self.replacement_style(range);

        if !range.is_empty() {
            self.delete_span(range)?;
        }
        if text.is_empty() {
            return Ok(TextRange::caret(range.start));
        }
        self.insert_text_at(range.start, &text, style)?;
        Ok(TextRange::new(range.start, range.start + text.chars().count()))
    }

    /// Replaces `range` with copies of the blocks of `fragment`.
    pub fn replace_blocks(&mut self, range: TextRange, fragment: &Document) -> Result<TextRange> {
        self.check_range(range)?;
        if fragment.paragraph_ids().is_empty() {
            return self.replace(range, "");
        }
        if !range.is_empty() {
            self.delete_span(range)?;
        }
        let inserted_len = fragment.len();

        let Some((id, offset)) = self.paragraph_at(range.start)? else {
            for &block in &fragment.root {
                self.copy_block_from(fragment, block, Container::Root, usize::MAX);
            }
            self.prune_empty();
            self.touch();
            return Ok(TextRange::new(0, inserted_len));
        };

        let (container, index) = self.position_of(id).ok_or(EditorError::InvalidRange {
            start: range.start,
            end: range.end,
            len: self.len(),
        })?;
        let Some(paragraph) = self.paragraph_mut(id) else {
            return Ok(TextRange::caret(range.start));
        };
        let tail = paragraph.split_off(offset);
        let right = Paragraph {
            runs: Vec::new(),
            alignment: paragraph.alignment,
            margin: paragraph.margin,
        };
        let left_empty = paragraph.is_empty();

        let mut at = index + 1;
        for &block in &fragment.root {
            self.copy_block_from(fragment, block, container, at);
            at += 1;
        }
        if !tail.is_empty() {
            let mut right = right;
            right.append_runs(tail);
            let right_id = self.alloc_detached(Block::Paragraph(right), container);
            self.attach(right_id, container, at);
        }

        let start = if left_empty {
            self.remove_block(id);
            range.start
        } else {
            range.start + 1
        };
        self.prune_empty();
        self.touch();
        Ok(TextRange::new(start, start + inserted_len))
    }

    fn alloc_detached(&mut self, block: Block, parent: Container) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Some(BlockSlot { block, parent }));
        id
    }

    fn copy_block_from(
        &mut self,
        source: &Document,
        id: BlockId,
        container: Container,
        index: usize,
    ) -> Option<BlockId> {
        let copy = match source.block(id)? {
            Block::Paragraph(paragraph) => Block::Paragraph(paragraph.clone()),
            Block::List(list) => Block::List(List {
                items: Vec::new(),
                ..list.clone()
            }),
        };
        let new_id = self.alloc_detached(copy, container);
        self.attach(new_id, container, index);
        if let Some(list) = source.list(id) {
            for &item in &list.items {
                let Some(source_item) = source.list_item(item) else {
                    continue;
                };
                let Some(new_item) = self.add_item(new_id) else {
                    continue;
                };
                for &child in &source_item.blocks {
                    self.copy_block_from(source, child, Container::Item(new_item), usize::MAX);
                }
            }
        }
        Some(new_id)
    }

    fn delete_span(&mut self, range: TextRange) -> Result<()> {
        let (Some((first, first_offset)), Some((last, last_offset))) =
            (self.paragraph_at(range.start)?, self.paragraph_at(range.end)?)
        else {
            return Ok(());
        };

        if first == last {
            if let Some(paragraph) = self.paragraph_mut(first) {
                paragraph.delete(first_offset, last_offset);
            }
            return Ok(());
        }

        let order = self.paragraph_ids();
        let from = order.iter().position(|&id| id == first).unwrap_or(0);
        let to = order.iter().position(|&id| id == last).unwrap_or(from);

        let tail = self
            .paragraph_mut(last)
            .map(|paragraph| paragraph.split_off(last_offset))
            .unwrap_or_default();
        if let Some(paragraph) = self.paragraph_mut(first) {
            let len = paragraph.char_len();
            paragraph.delete(first_offset, len);
        }
        for &id in &order[from + 1..=to] {
            self.remove_block(id);
        }
        if let Some(paragraph) = self.paragraph_mut(first) {
            paragraph.append_runs(tail);
        }
        Ok(())
    }

    fn insert_text_at(&mut self, position: usize, text: &str, style: RunStyle) -> Result<()> {
        let (id, offset) = match self.paragraph_at(position)? {
            Some(target) => target,
            None => (self.push_paragraph(Paragraph::new()), 0),
        };

        let mut lines = text.split(PARAGRAPH_TERMINATOR);
        let first_line = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        let Some(paragraph) = self.paragraph_mut(id) else {
            return Ok(());
        };
        if rest.is_empty() {
            paragraph.insert_text(offset, first_line, style);
            return Ok(());
        }

        let tail = paragraph.split_off(offset);
        paragraph.insert_text(offset, first_line, style.clone());
        let (alignment, margin) = (paragraph.alignment, paragraph.margin);

        let Some((container, mut index)) = self.position_of(id) else {
            return Ok(());
        };
        let mut last = id;
        for line in rest {
            let mut next = Paragraph {
                runs: Vec::new(),
                alignment,
                margin,
            };
            next.insert_text(0, line, style.clone());
            index += 1;
            last = self.alloc_detached(Block::Paragraph(next), container);
            self.attach(last, container, index);
        }
        if let Some(paragraph) = self.paragraph_mut(last) {
            paragraph.append_runs(tail);
        }
        Ok(())
    }

    // ---- block and list helpers ----

    pub fn set_paragraph_alignment(&mut self, id: BlockId, alignment: TextAlignment) {
        if let Some(paragraph) = self.paragraph_mut(id) {
            paragraph.alignment = alignment;
        }
    }

    /// Sets the left margin, rounded to the twip grid.
    pub fn set_paragraph_margin(&mut self, id: BlockId, margin: f64) {
        if let Some(paragraph) = self.paragraph_mut(id) {
            paragraph.margin = snap_length(margin.max(0.0));
        }
    }

    pub fn set_list_marker_style(&mut self, id: BlockId, marker_style: MarkerStyle) {
        self.touch();
        if let Some(list) = self.list_mut(id) {
            list.marker_style = marker_style;
        }
    }

    /// Sets marker offset and padding, rounded to the twip grid.
    pub fn set_list_indent(&mut self, id: BlockId, marker_offset: f64, padding: f64) {
        self.touch();
        if let Some(list) = self.list_mut(id) {
            list.marker_offset = snap_length(marker_offset);
            list.padding = snap_length(padding);
        }
    }

    /// Moves sibling paragraphs into a new list inserted where the first one
    /// was, one item per paragraph.
    pub fn wrap_paragraphs_in_list(
        &mut self,
        paragraphs: &[BlockId],
        marker_style: MarkerStyle,
    ) -> Option<BlockId> {
        let first = *paragraphs.first()?;
        let (container, index) = self.position_of(first)?;

        let list = self.alloc_detached(Block::List(List::new(marker_style)), container);
        self.attach(list, container, index);

        for &paragraph in paragraphs {
            if self.paragraph(paragraph).is_none() || self.detach(paragraph).is_none() {
                continue;
            }
            if let Some(item) = self.add_item(list) {
                self.attach(paragraph, Container::Item(item), 0);
            }
        }

        if self.list(list).is_some_and(|list| list.items.is_empty()) {
            self.detach(list);
            self.release(list);
            return None;
        }
        self.touch();
        Some(list)
    }

    /// Moves the blocks of `items` out of their list, right after it.
    ///
    /// Items of the list that follow the first unwrapped one and are not
    /// unwrapped themselves move into a new list placed after the unwrapped
    /// blocks, so document order is kept. Emptied lists are removed.
    pub fn unwrap_list_items(&mut self, items: &[ItemId]) {
        let mut remaining: Vec<ItemId> = items.to_vec();
        while let Some(&head) = remaining.first() {
            let Some(list_id) = self.list_item(head).map(ListItem::list) else {
                remaining.remove(0);
                continue;
            };
            let group: Vec<ItemId> = remaining
                .iter()
                .copied()
                .filter(|&item| self.list_item(item).is_some_and(|item| item.list == list_id))
                .collect();
            remaining.retain(|item| !group.contains(item));
            self.unwrap_group(list_id, &group);
        }
        self.touch();
    }

    fn unwrap_group(&mut self, list_id: BlockId, group: &[ItemId]) {
        let Some(list) = self.list(list_id) else {
            return;
        };
        let template = List {
            items: Vec::new(),
            ..list.clone()
        };
        let ordered: Vec<ItemId> = list.items.iter().copied().filter(|item| group.contains(item)).collect();
        let Some(first_index) = list.items.iter().position(|item| group.contains(item)) else {
            return;
        };
        let trailing: Vec<ItemId> = list.items[first_index..]
            .iter()
            .copied()
            .filter(|item| !group.contains(item))
            .collect();
        let Some((container, list_index)) = self.position_of(list_id) else {
            return;
        };

        let mut at = list_index + 1;
        for item_id in ordered {
            let blocks = self
                .list_item(item_id)
                .map(|item| item.blocks.clone())
                .unwrap_or_default();
            for block in blocks {
                self.detach(block);
                self.attach(block, container, at);
                at += 1;
            }
            if let Some(list) = self.list_mut(list_id) {
                list.items.retain(|&item| item != item_id);
            }
            self.release_item(item_id);
        }

        if !trailing.is_empty() {
            let new_list = self.alloc_detached(Block::List(template), container);
            self.attach(new_list, container, at);
            if let Some(list) = self.list_mut(list_id) {
                list.items.retain(|item| !trailing.contains(item));
            }
            for &item_id in &trailing {
                if let Some(item) = self.items.get_mut(item_id.0).and_then(Option::as_mut) {
                    item.list = new_list;
                }
            }
            if let Some(list) = self.list_mut(new_list) {
                list.items = trailing;
            }
        }

        if self.list(list_id).is_some_and(|list| list.items.is_empty()) {
            self.detach(list_id);
            self.release(list_id);
        }
    }
}

/// Converts `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Line, word and character counts shown in the editor's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub lines: usize,
    pub words: usize,
    pub chars: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            lines: text.split('\n').count(),
            words: text.split_whitespace().count(),
            chars: text.chars().filter(|&c| c != '\n' && c != '\r').count(),
        }
    }
}
