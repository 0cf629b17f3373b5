mod common;

use rusty_koi::data::filter::{filter_indices, filtered_indices};
use rusty_koi::data::sort::SortDirection;
use rusty_koi::view::page::{page_count, paginate};
use rusty_koi::{Dataset, Error, Row, TableView, ViewState, compute_view};

use common::{column, koi_dataset};

fn numbered(n: usize) -> Dataset {
    Dataset::from_rows((0..n).map(|i| Row::new().with("id", i as f64)).collect())
}

#[test]
fn test_empty_query_matches_every_row() {
    for dataset in [koi_dataset(), numbered(0), numbered(40)] {
        for page_size in [1, 7, 15] {
            let state = ViewState::with_page_size(page_size).unwrap();
            assert_eq!(compute_view(&dataset, &state).total_matching, dataset.len());
        }
    }
}

#[test]
fn test_query_is_case_insensitive_and_sees_numbers_as_text() {
    let dataset = koi_dataset();
    let mut table = TableView::new(&dataset);

    table.set_query("false positive");
    assert_eq!(table.view().total_matching, 2);

    table.set_query("54.4");
    let view = table.view();
    assert_eq!(view.total_matching, 1);
    assert_eq!(column(&dataset, &view.visible_rows, "kepoi_name"), ["K00752.02"]);

    table.set_query("no such object");
    let view = table.view();
    assert_eq!(view.total_matching, 0);
    assert_eq!(view.page_count, 1);
    assert!(view.visible_rows.is_empty());
}

#[test]
fn test_filter_is_idempotent() {
    let dataset = koi_dataset();
    for query in ["", "k0075", "CAND", "2.", "zzz"] {
        let once = filtered_indices(&dataset, query);
        let twice = filter_indices(&dataset, once.iter().copied(), query);
        assert_eq!(once, twice, "query {query:?}");
    }
}

#[test]
fn test_sort_toggles_asc_desc_asc() {
    let dataset = koi_dataset();
    let mut table = TableView::new(&dataset);

    table.set_sort("koi_period");
    assert_eq!(table.state().sort_direction, SortDirection::Asc);
    let asc = column(&dataset, &table.view().visible_rows, "koi_period");
    assert_eq!(
        asc,
        ["1.737", "2.526", "9.488", "15.834", "16.068", "19.899", "54.418", ""]
    );

    table.set_sort("koi_period");
    assert_eq!(table.state().sort_direction, SortDirection::Desc);
    let desc = column(&dataset, &table.view().visible_rows, "koi_period");
    assert_eq!(
        desc,
        ["54.418", "19.899", "16.068", "15.834", "9.488", "2.526", "1.737", ""]
    );

    table.set_sort("koi_period");
    assert_eq!(table.state().sort_direction, SortDirection::Asc);
    assert_eq!(column(&dataset, &table.view().visible_rows, "koi_period"), asc);

    table.set_sort("koi_prad");
    assert_eq!(table.state().sort_direction, SortDirection::Asc);
}

#[test]
fn test_mixed_column_sorts_numbers_before_text() {
    let dataset = Dataset::from_rows(
        ["10", "2", "abc"]
            .into_iter()
            .map(|v| Row::new().with("value", v))
            .collect(),
    );
    let mut table = TableView::new(&dataset);
    table.set_sort("value");
    assert_eq!(
        column(&dataset, &table.view().visible_rows, "value"),
        ["2", "10", "abc"]
    );
}

#[test]
fn test_sort_is_stable() {
    let dataset = Dataset::from_rows(
        [("a", 2.0), ("b", 1.0), ("c", 2.0), ("d", 1.0), ("e", 2.0)]
            .into_iter()
            .map(|(name, key)| Row::new().with("name", name).with("key", key))
            .collect(),
    );
    let mut table = TableView::new(&dataset);

    table.set_sort("key");
    let view = table.view();
    assert_eq!(column(&dataset, &view.visible_rows, "name"), ["b", "d", "a", "c", "e"]);

    table.set_sort("key");
    let view = table.view();
    assert_eq!(column(&dataset, &view.visible_rows, "name"), ["a", "c", "e", "b", "d"]);
}

#[test]
fn test_unknown_sort_field_keeps_dataset_order() {
    let dataset = koi_dataset();
    let mut table = TableView::new(&dataset);
    table.set_sort("koi_teq");
    assert_eq!(table.view().row_indices, (0..dataset.len()).collect::<Vec<_>>());
}

#[test]
fn test_pagination_of_25_rows() {
    let dataset = numbered(25);
    let mut table = TableView::with_state(&dataset, ViewState::with_page_size(10).unwrap());
    assert_eq!(table.page_count(), 3);

    table.set_page_index(2);
    let view = table.view();
    assert_eq!(view.visible_rows.len(), 5);
    assert_eq!((view.window_start, view.window_end), (20, 25));

    table.set_page_index(99);
    assert_eq!(table.state().page_index, 2);
    table.next_page();
    assert_eq!(table.state().page_index, 2);
    table.previous_page();
    assert_eq!(table.state().page_index, 1);
}

#[test]
fn test_mutations_reset_page_index() {
    let dataset = numbered(40);
    let mut table = TableView::with_state(&dataset, ViewState::with_page_size(5).unwrap());

    table.set_page_index(3);
    table.set_query("1");
    assert_eq!(table.state().page_index, 0);

    table.set_page_index(1);
    table.set_sort("id");
    assert_eq!(table.state().page_index, 0);

    table.set_page_index(1);
    table.set_page_size(20).unwrap();
    assert_eq!(table.state().page_index, 0);
}

#[test]
fn test_stale_page_index_is_clamped_when_rendering() {
    let dataset = numbered(12);
    let state = ViewState {
        page_index: 50,
        ..ViewState::with_page_size(5).unwrap()
    };
    let view = compute_view(&dataset, &state);
    assert_eq!(view.page_index, 2);
    assert_eq!(view.visible_rows.len(), 2);
}

#[test]
fn test_invalid_page_size_is_an_error() {
    assert_eq!(ViewState::with_page_size(0).unwrap_err(), Error::InvalidPageSize(0));
    assert_eq!(page_count(10, 0).unwrap_err(), Error::InvalidPageSize(0));
    assert!(paginate(&[1, 2, 3], 0, 0).is_err());

    let dataset = numbered(3);
    let mut table = TableView::new(&dataset);
    assert!(table.set_page_size(0).is_err());
    assert_eq!(table.state().page_size.get(), 15);
}
