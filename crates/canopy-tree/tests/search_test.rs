use canopy_tree::{Hierarchy, search};

fn knowledge_map() -> Hierarchy {
    Hierarchy::from_json(
        r#"{ "id": "ml", "label": "Machine learning", "children": [
            { "id": "sup", "label": "Supervised learning", "children": [
                { "id": "reg", "label": "Linear regression" },
                { "id": "trees", "label": "Decision trees" }
            ] },
            { "id": "unsup", "label": "Unsupervised learning", "children": [
                { "id": "kmeans", "label": "K-means clustering" }
            ] }
        ] }"#,
    )
    .unwrap()
}

#[test]
fn hits_carry_breadcrumb_paths() {
    let h = knowledge_map();
    let hits = search(&h, "kmeans", None);
    assert_eq!(hits[0].node_id, "kmeans");
    assert_eq!(hits[0].path, ["ml", "unsup", "kmeans"]);
}

#[test]
fn search_is_case_insensitive_and_fuzzy() {
    let h = knowledge_map();
    let hits = search(&h, "DECTREE", None);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].label, "Decision trees");
}

#[test]
fn limit_truncates_ranked_hits() {
    let h = knowledge_map();
    let all = search(&h, "learning", None);
    assert!(all.len() >= 3);
    let top = search(&h, "learning", Some(2));
    assert_eq!(top.len(), 2);
    assert_eq!(top[0], all[0]);
    assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn no_match_and_empty_query_return_nothing() {
    let h = knowledge_map();
    assert!(search(&h, "zzzz", None).is_empty());
    assert!(search(&h, "", None).is_empty());
}
