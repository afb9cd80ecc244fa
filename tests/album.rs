mod common;

use common::{ImageRejectingSink, MockFetcher, UnsavableSink, approx, image_count, png_bytes, texts};
use fotoalbum_pdf::{
    AlbumConfig, AlbumItem, AlbumProject, Description, DrawOp, Error, MediaReference,
    RecordingSink, TextAlign, build_album,
};

fn placeholder_item(name: &str) -> AlbumItem {
    AlbumItem {
        display_name: name.to_string(),
        media: None,
        story_text: None,
        uploaded_by: None,
        descriptions: Vec::new(),
    }
}

#[tokio::test]
async fn sommar_2024_end_to_end() {
    let fetcher = MockFetcher::new().not_found("https://bilder.example/b.jpg");
    let project = AlbumProject::new(
        "Sommar 2024",
        vec![
            AlbumItem::new("A", MediaReference::inline(png_bytes(800, 600), "image/png")).with_story(
                "Vi badade i sjön.\nSolen sken hela dagen.\nPå kvällen grillade vi.",
            ),
            AlbumItem::new("B", MediaReference::remote("https://bilder.example/b.jpg")),
        ],
    );
    let config = AlbumConfig::default();
    let mut sink = RecordingSink::new();
    let report = build_album(&project, &config, &fetcher, &mut sink).await.unwrap();

    let pages = sink.pages();
    assert_eq!(pages.len(), 3);

    // Cover: title and subtitle, centered.
    let cover = texts(&pages[0]);
    assert_eq!(cover.len(), 2);
    assert_eq!(cover[0].0, "Sommar 2024");
    assert!(approx(cover[0].2, 24.0));
    assert_eq!(cover[1].0, "Fotoalbum");
    assert!(cover[1].1 > cover[0].1);
    assert!(pages[0].iter().all(|op| matches!(
        op,
        DrawOp::Text { align: TextAlign::Center, x, .. } if approx(*x, 105.0)
    )));

    // Item A: image then three lines under it.
    assert_eq!(image_count(&pages[1]), 1);
    let DrawOp::Image { x, y, width, height, .. } = &pages[1][0] else {
        panic!("first op on item page should be the image: {:?}", pages[1][0]);
    };
    assert!(approx(*width, 180.0));
    assert!(approx(*height, 135.0));
    assert!(approx(*x, 15.0));
    assert!(approx(*y, 15.0));
    let a_lines = texts(&pages[1]);
    assert_eq!(
        a_lines.iter().map(|(t, _, _)| t.as_str()).collect::<Vec<_>>(),
        ["Vi badade i sjön.", "Solen sken hela dagen.", "På kvällen grillade vi."]
    );
    assert!(approx(a_lines[0].1, 15.0 + 135.0 + 10.0));

    // Item B: nothing but the network placeholder.
    assert_eq!(
        texts(&pages[2]),
        vec![(
            "Kunde inte ladda bilddata (nätverksfel): B".to_string(),
            15.0,
            12.0
        )]
    );
    assert_eq!(image_count(&pages[2]), 0);

    assert_eq!(sink.saved_as(), Some("sommar_2024_fotoalbum.json"));
    assert_eq!(report.pages, 3);
    assert_eq!(report.items, 2);
    assert_eq!(report.degraded_items, 1);
    assert_eq!(report.file.to_str(), Some("sommar_2024_fotoalbum.json"));
}

#[tokio::test]
async fn items_keep_input_order_and_are_fetched_sequentially() {
    let uris: Vec<String> = (0..5).map(|i| format!("https://bilder.example/{i}.png")).collect();
    let mut fetcher = MockFetcher::new();
    for (i, uri) in uris.iter().enumerate() {
        fetcher = if i % 2 == 0 {
            fetcher.respond(uri, 200, Some("image/png"), png_bytes(4 + i as u32, 3))
        } else {
            fetcher.not_found(uri)
        };
    }
    let items = uris
        .iter()
        .enumerate()
        .map(|(i, uri)| AlbumItem::new(format!("Bild {i}"), MediaReference::remote(uri.as_str())))
        .collect();
    let project = AlbumProject::new("Ordning", items);

    let mut sink = RecordingSink::new();
    build_album(&project, &AlbumConfig::default(), &fetcher, &mut sink)
        .await
        .unwrap();

    assert_eq!(*fetcher.requests.borrow(), uris);
    let pages = sink.pages();
    assert_eq!(pages.len(), 6);
    for (i, page) in pages[1..].iter().enumerate() {
        if i % 2 == 0 {
            let Some(DrawOp::Image { pixel_width, .. }) = page.first() else {
                panic!("page {i} should start with its image");
            };
            assert_eq!(*pixel_width, 4 + i as u32);
        } else {
            assert_eq!(
                texts(page)[0].0,
                format!("Kunde inte ladda bilddata (nätverksfel): Bild {i}")
            );
        }
    }
}

#[tokio::test]
async fn every_item_gets_its_own_page_even_when_all_fail() {
    let items = vec![
        placeholder_item("Ett"),
        AlbumItem::new("Två", MediaReference::inline(png_bytes(2, 2), "image/svg+xml")),
        AlbumItem::new("Tre", MediaReference::inline(vec![0, 1, 2, 3], "image/jpeg")),
        AlbumItem::new("Fyra", MediaReference::remote("https://nere.example/4.png")),
    ];
    let project = AlbumProject::new("Trasigt", items);
    let mut sink = RecordingSink::new();
    let report = build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();

    let pages = sink.pages();
    assert_eq!(pages.len(), 1 + 4);
    let firsts: Vec<String> = pages[1..].iter().map(|p| texts(p)[0].0.clone()).collect();
    assert_eq!(
        firsts,
        [
            "Bilddata saknas för: Ett",
            "Bildformatet stöds inte (image/svg+xml): Två",
            "Kunde inte läsa bilddata: Tre",
            "Kunde inte ladda bilddata (nätverksfel): Fyra",
        ]
    );
    assert!(pages[1..].iter().all(|p| texts(p).len() == 1));
    assert_eq!(report.degraded_items, 4);
}

#[tokio::test]
async fn failed_item_does_not_flow_its_story() {
    let mut item = placeholder_item("Saknas");
    item.story_text = Some("Den här texten ska inte synas.".into());
    let project = AlbumProject::new("X", vec![item]);
    let mut sink = RecordingSink::new();
    build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();
    assert_eq!(texts(&sink.pages()[1]).len(), 1);
}

#[tokio::test]
async fn long_story_continues_on_extra_pages_and_next_item_starts_fresh() {
    let story = (0..120)
        .map(|i| format!("Mening nummer {i} om en lång dag vid havet."))
        .collect::<Vec<_>>()
        .join("\n");
    let project = AlbumProject::new(
        "Långt",
        vec![
            AlbumItem::new("Havet", MediaReference::inline(png_bytes(40, 30), "image/png")).with_story(story),
            AlbumItem::new("Nästa", MediaReference::inline(png_bytes(30, 40), "image/png")),
        ],
    );
    let mut sink = RecordingSink::new();
    let report = build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();

    let pages = sink.pages();
    // cover + 3 pages of "Havet" + 1 page of "Nästa"
    assert_eq!(pages.len(), 5);
    assert_eq!(report.pages, 5);
    for p in &pages[2..4] {
        let t = texts(p);
        assert_eq!(t[0].0, "(Fortsättning för: Havet)");
        assert!(approx(t[0].2, 10.0));
        assert!(t[1..].iter().all(|(_, _, size)| approx(*size, 12.0)));
    }
    let line_count: usize = pages[1..4]
        .iter()
        .map(|p| texts(p).iter().filter(|(t, _, _)| t.starts_with("Mening")).count())
        .sum();
    assert_eq!(line_count, 120);
    assert_eq!(image_count(&pages[4]), 1);
    assert!(texts(&pages[4]).is_empty());
}

#[tokio::test]
async fn uploader_description_is_the_only_fallback() {
    let mut with_uploader = AlbumItem::new("Egen", MediaReference::inline(png_bytes(4, 3), "image/png"));
    with_uploader.uploaded_by = Some("anna".into());
    with_uploader.descriptions = vec![
        Description { author: "bertil".into(), text: "Bertils kommentar".into() },
        Description { author: "anna".into(), text: "Annas beskrivning".into() },
    ];

    let mut others_only = AlbumItem::new("Andras", MediaReference::inline(png_bytes(4, 3), "image/png"));
    others_only.uploaded_by = Some("anna".into());
    others_only.descriptions = vec![Description { author: "bertil".into(), text: "Bertils kommentar".into() }];

    let project = AlbumProject::new("Reserv", vec![with_uploader, others_only]);
    let mut sink = RecordingSink::new();
    build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();

    let pages = sink.pages();
    assert_eq!(
        texts(&pages[1]).iter().map(|(t, _, _)| t.as_str()).collect::<Vec<_>>(),
        ["Annas beskrivning"]
    );
    assert!(texts(&pages[2]).is_empty());
}

#[tokio::test]
async fn whitespace_story_emits_nothing() {
    let project = AlbumProject::new(
        "Tomt",
        vec![AlbumItem::new("Bild", MediaReference::inline(png_bytes(4, 3), "image/png")).with_story("  \n  ")],
    );
    let mut sink = RecordingSink::new();
    build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();
    let pages = sink.pages();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].len(), 1);
    assert_eq!(image_count(&pages[1]), 1);
}

#[tokio::test]
async fn sink_image_failure_is_reported_on_the_items_page() {
    let project = AlbumProject::new(
        "Sink",
        vec![
            AlbumItem::new("Första", MediaReference::inline(png_bytes(4, 3), "image/png"))
                .with_story("Syns inte."),
            AlbumItem::new("Andra", MediaReference::inline(png_bytes(4, 3), "image/png")),
        ],
    );
    let mut sink = ImageRejectingSink::default();
    let report = build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();

    let pages = sink.inner.pages();
    assert_eq!(pages.len(), 3);
    assert_eq!(
        texts(&pages[1]).iter().map(|(t, _, _)| t.as_str()).collect::<Vec<_>>(),
        ["Ett fel uppstod för: Första"]
    );
    assert_eq!(texts(&pages[2])[0].0, "Ett fel uppstod för: Andra");
    assert_eq!(report.degraded_items, 2);
}

#[tokio::test]
async fn save_failure_is_fatal() {
    let project = AlbumProject::new("Fel", vec![placeholder_item("Ett")]);
    let mut sink = UnsavableSink::default();
    let err = build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
}

#[tokio::test]
async fn empty_project_is_just_a_cover() {
    let project = AlbumProject::new("Inget", Vec::new());
    let mut sink = RecordingSink::new();
    let report = build_album(&project, &AlbumConfig::default(), &MockFetcher::new(), &mut sink)
        .await
        .unwrap();
    assert_eq!(sink.page_count(), 1);
    assert_eq!(report.pages, 1);
    assert_eq!(sink.saved_as(), Some("inget_fotoalbum.json"));
}
