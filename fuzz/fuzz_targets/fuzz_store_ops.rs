#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pen_store::{Id, ObjectStore, PersistError, Storable, StoreChange, XmlElement};
use pen_undo::UndoManager;

#[derive(Debug, Clone, PartialEq)]
struct Value(u16);

impl Storable for Value {
    fn element_name() -> &'static str {
        "value"
    }

    fn read(el: &XmlElement) -> Result<Self, PersistError> {
        Ok(Self(el.parse_attr("v")?))
    }

    fn write(&self, el: &mut XmlElement) {
        el.set_attr("v", self.0);
    }
}

#[derive(Debug, Arbitrary)]
enum Op {
    Add(u16),
    Remove(u8),
    Replace(u8, u16),
    Undo,
    Redo,
    Rollback(u8),
    MarkClean,
}

#[derive(Debug, Arbitrary)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let capacity = usize::from(input.capacity % 16) + 1;
    let mut store = ObjectStore::<Value>::new();
    let mut undo = UndoManager::<StoreChange<Value>>::with_capacity(capacity);
    let mut issued = 0u32;

    for op in input.ops.iter().take(256) {
        let before = store.change_num();
        match op {
            Op::Add(v) => {
                undo.begin_command(1, "add");
                let id = store.add(&mut undo, Value(*v));
                undo.end_command(1);
                assert!(id.raw() > issued);
                issued = id.raw();
            }
            Op::Remove(raw) => {
                undo.begin_command(2, "remove");
                let _ = store.remove(&mut undo, Id::new(u32::from(*raw)));
                undo.end_command(2);
            }
            Op::Replace(raw, v) => {
                undo.begin_command(3, "replace");
                let _ = store.replace(&mut undo, Id::new(u32::from(*raw)), Value(*v));
                undo.end_command(3);
            }
            Op::Undo => {
                undo.undo(&mut store);
            }
            Op::Redo => {
                undo.redo(&mut store);
            }
            Op::Rollback(raw) => {
                let snapshot: Vec<_> = {
                    let mut pairs: Vec<_> =
                        store.all_pairs().map(|(id, v)| (id, v.clone())).collect();
                    pairs.sort_by_key(|(id, _)| *id);
                    pairs
                };
                undo.begin_command(4, "abandoned");
                store.add(&mut undo, Value(0));
                let _ = store.remove(&mut undo, Id::new(u32::from(*raw)));
                undo.rollback(&mut store);
                let mut after: Vec<_> = store.all_pairs().map(|(id, v)| (id, v.clone())).collect();
                after.sort_by_key(|(id, _)| *id);
                assert_eq!(after, snapshot);
                issued = store.next_id().raw() - 1;
            }
            Op::MarkClean => undo.mark_clean(),
        }

        assert!(store.change_num() >= before);
        assert!(undo.undo_depth() <= capacity);
        assert!(store.all_ids().all(|id| id.raw() < store.next_id().raw()));
    }
});
