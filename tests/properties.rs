use dictio_core::model::Language;
use dictio_core::parsers::submission::parse_pair;
use dictio_core::services::linker::{link, Outcome};
use dictio_core::services::users::register_user;
use dictio_core::store::{Filter, Store};
use proptest::prelude::*;

fn language() -> impl Strategy<Value = Language> {
    prop::sample::select(Language::ALL.to_vec())
}

fn term() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,12}[a-zA-Z]"
}

proptest! {
    #[test]
    fn parsed_pairs_are_mirror_images(a in term(), la in language(), b in term(), lb in language()) {
        let entry = format!(" {a} @{la}");
        let mirror = format!("{b}@ {} ", lb.iso3());
        let (e, m) = parse_pair(Some(&entry), Some(&mirror)).unwrap();
        let m = m.unwrap();

        prop_assert_eq!(&e.index, a.trim());
        prop_assert_eq!(e.language, Some(la));
        prop_assert_eq!(e.mirror.as_deref(), Some(m.index.as_str()));
        prop_assert_eq!(e.mirror_language, m.language);
        prop_assert_eq!(m.mirror.as_deref(), Some(e.index.as_str()));
        prop_assert_eq!(m.mirror_language, e.language);
    }

    #[test]
    fn linking_twice_writes_one_pair(a in term(), la in language(), b in term(), lb in language()) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let store = Store::in_memory();
            let user = register_user(&store, "ana", "ana@example.org").await.unwrap().id;
            let entry = format!("{a}@{la}");
            let mirror = format!("{b}@{lb}");

            let first = link(&store, Some(&user), Some(&entry), Some(&mirror)).await.unwrap();
            let second = link(&store, Some(&user), Some(&entry), Some(&mirror)).await.unwrap();

            assert_eq!(first.outcome, Outcome::New);
            assert_eq!(second.outcome, Outcome::Tenured);
            assert_eq!(first.definition_node, second.definition_node);

            let node = store.find(&Filter::by_node(first.definition_node.clone())).await.unwrap();
            assert_eq!(node.len(), 2);
            assert!(node[0].mirrors(&node[1]));
            assert_eq!(store.stats().await.entries, 2);
        });
    }
}
