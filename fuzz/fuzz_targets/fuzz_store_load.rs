#![no_main]

use libfuzzer_sys::fuzz_target;
use pen_store::{ObjectStore, PersistError, Storable, XmlElement, XmlOutput, parse_document};

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    n: i64,
    text: String,
}

impl Storable for Entry {
    fn element_name() -> &'static str {
        "entry"
    }

    fn read(el: &XmlElement) -> Result<Self, PersistError> {
        Ok(Self {
            n: el.parse_attr_or("n", 0)?,
            text: el.text().to_owned(),
        })
    }

    fn write(&self, el: &mut XmlElement) {
        el.set_attr("n", self.n);
        el.set_text(&self.text);
    }
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must parse or fail cleanly, never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(root) = parse_document(text) else {
        return;
    };

    let mut store = ObjectStore::<Entry>::new();
    let mut input = root.input();
    if store.load(&mut input).is_err() {
        return;
    }

    let next = store.next_id().raw();
    assert!(store.all_ids().all(|id| id.raw() < next));

    // Whatever loaded must survive a save and reload unchanged.
    let mut out = XmlOutput::new(Vec::new());
    out.start_element("entries").unwrap();
    store.save(&mut out).unwrap();
    out.end_element("entries").unwrap();
    let saved = String::from_utf8(out.into_inner()).unwrap();

    let reparsed = parse_document(&saved).unwrap();
    let mut reloaded = ObjectStore::<Entry>::new();
    reloaded.load(&mut reparsed.input()).unwrap();
    assert_eq!(reloaded.len(), store.len());
    for (id, entry) in store.all_pairs() {
        let Ok(again) = reloaded.get(id) else {
            panic!("id {id} lost on reload");
        };
        assert_eq!(again.n, entry.n);
    }
});
