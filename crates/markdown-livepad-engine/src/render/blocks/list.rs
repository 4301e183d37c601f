use super::{
    classify::LineKind,
    types::{Block, ListItem, Segment},
};

#[derive(Debug)]
enum ListState {
    None,
    Open { ordered: bool, items: Vec<ListItem> },
}

/// Groups consecutive list-item lines into `List` blocks.
///
/// The first item fixes the kind of the list. Task items and plain bullets are
/// both unordered and mix freely; switching between ordered and unordered, or
/// any non-item line (including a blank one), closes the open list.
pub struct ListStateMachine {
    state: ListState,
    out: Vec<Segment>,
}

impl ListStateMachine {
    pub fn new() -> Self {
        Self {
            state: ListState::None,
            out: vec![],
        }
    }

    /// Runs the machine over `segments`, returning blocks and unclaimed lines
    /// in their original order.
    pub fn group(segments: Vec<Segment>) -> Vec<Segment> {
        let mut machine = Self::new();
        for segment in segments {
            machine.push(segment);
        }
        machine.finish()
    }

    pub fn push(&mut self, segment: Segment) {
        let Segment::Line(line) = &segment else {
            self.close();
            self.out.push(segment);
            return;
        };

        let LineKind::ListItem {
            ordered,
            checked,
            text,
        } = &line.kind
        else {
            self.close();
            self.out.push(segment);
            return;
        };

        let item = ListItem {
            text: text.clone(),
            is_task: checked.is_some(),
            checked: checked.unwrap_or(false),
        };

        match &mut self.state {
            ListState::Open {
                ordered: open_kind,
                items,
            } if *open_kind == *ordered => items.push(item),
            _ => {
                self.close();
                self.state = ListState::Open {
                    ordered: *ordered,
                    items: vec![item],
                };
            }
        }
    }

    pub fn finish(mut self) -> Vec<Segment> {
        self.close();
        self.out
    }

    fn close(&mut self) {
        if let ListState::Open { ordered, items } =
            std::mem::replace(&mut self.state, ListState::None)
        {
            self.out.push(Segment::Block(Block::List { ordered, items }));
        }
    }
}

impl Default for ListStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::blocks::classify::ClassifiedLine;
    use pretty_assertions::assert_eq;

    fn lines(doc: &str) -> Vec<Segment> {
        doc.split('\n')
            .map(|l| Segment::Line(ClassifiedLine::new(l)))
            .collect()
    }

    fn item(text: &str) -> ListItem {
        ListItem {
            text: text.to_string(),
            is_task: false,
            checked: false,
        }
    }

    #[test]
    fn groups_consecutive_items_and_keeps_trailing_lines() {
        let out = ListStateMachine::group(lines("- a\n- b\n\ntext"));
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0],
            Segment::Block(Block::List {
                ordered: false,
                items: vec![item("a"), item("b")],
            })
        );
        assert!(matches!(&out[1], Segment::Line(l) if l.is_blank()));
        assert!(matches!(&out[2], Segment::Line(l) if l.text == "text"));
    }

    #[test]
    fn kind_change_splits_lists() {
        let out = ListStateMachine::group(lines("1. one\n2. two\n- bullet"));
        assert_eq!(
            out,
            vec![
                Segment::Block(Block::List {
                    ordered: true,
                    items: vec![item("one"), item("two")],
                }),
                Segment::Block(Block::List {
                    ordered: false,
                    items: vec![item("bullet")],
                }),
            ]
        );
    }

    #[test]
    fn task_and_plain_items_share_a_list() {
        let out = ListStateMachine::group(lines("- [ ] open\n- plain\n- [x] done"));
        assert_eq!(
            out,
            vec![Segment::Block(Block::List {
                ordered: false,
                items: vec![
                    ListItem {
                        text: "open".to_string(),
                        is_task: true,
                        checked: false,
                    },
                    item("plain"),
                    ListItem {
                        text: "done".to_string(),
                        is_task: true,
                        checked: true,
                    },
                ],
            })]
        );
    }

    #[test]
    fn blank_line_closes_list() {
        let out = ListStateMachine::group(lines("- a\n\n- b"));
        let lists = out
            .iter()
            .filter(|s| matches!(s, Segment::Block(Block::List { .. })))
            .count();
        assert_eq!(lists, 2);
    }

    #[test]
    fn existing_blocks_close_the_list() {
        let mut segments = lines("- a");
        segments.push(Segment::Block(Block::Hr));
        segments.extend(lines("- b"));
        let out = ListStateMachine::group(segments);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], Segment::Block(Block::Hr));
    }

    #[test]
    fn no_items_passes_everything_through() {
        let input = lines("para\nmore");
        assert_eq!(ListStateMachine::group(input.clone()), input);
    }
}
