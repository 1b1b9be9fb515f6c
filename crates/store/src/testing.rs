//! Record fixtures shared by the storage tests.

use docex_core::{ImageRecord, LinkRecord, TableEntry, TableRecord, TextRecord};

pub fn text_records() -> Vec<TextRecord> {
    vec![
        TextRecord::PageText {
            page: 1,
            text: "First page".into(),
        },
        TextRecord::PageText {
            page: 2,
            text: "Second page".into(),
        },
    ]
}

pub fn link_records() -> Vec<LinkRecord> {
    vec![LinkRecord::Slide {
        slide: 3,
        text: "Docs".into(),
        url: "https://example.com/docs".into(),
    }]
}

pub fn image_records() -> Vec<ImageRecord> {
    vec![ImageRecord::Shape {
        slide: 2,
        image_id: Some(7),
        blob: "AAEC".into(),
        format: "png".into(),
        width: Some(640),
        height: Some(480),
    }]
}

pub fn table_entries() -> Vec<TableEntry> {
    vec![
        TableEntry::Table(TableRecord::new(
            1,
            "Table Grid",
            vec![
                vec!["Name".into(), "Note".into()],
                vec!["Bolt".into(), "M6, \"zinc\"".into()],
            ],
        )),
        TableEntry::warning("No tables found with pdf-extract."),
    ]
}
