use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use stencil_editor::upload::UploadFile;
use stencil_editor::{
    Editor, EditorConfig, EditorState, NoticeLevel, Point, Transformation, UploadError,
};

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([90, 140, 200, 255])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn full_editing_session() {
    let mut editor = Editor::new(EditorConfig::default());

    // A text file is refused and nothing changes
    let err = editor
        .begin_upload(UploadFile::from_bytes("readme.txt", "text/plain", b"hello".to_vec()))
        .unwrap_err();
    assert!(matches!(err, UploadError::InvalidFileType { .. }));
    assert_eq!(*editor.state(), EditorState::default());

    // A real image is fitted and centered
    editor
        .begin_upload(UploadFile::from_bytes("photo.png", "image/png", png(800, 400)))
        .unwrap();
    assert!(editor.wait_upload());
    assert!(editor.state().image.loaded);
    assert_eq!(editor.state().image.url.as_deref(), Some("bytes://photo.png"));
    assert_eq!(
        editor.transformation(),
        Transformation {
            scale: 0.75,
            offset_x: 400.0,
            offset_y: 250.0
        }
    );

    // Pan is bounded by the mask
    assert_eq!(editor.drag_to(Point::new(900.0, 0.0)), Point::new(500.0, 250.0));

    // Zoom in, then reset
    editor.zoom_in();
    editor.set_zoom(1.5);
    assert_eq!(editor.transformation().scale, 1.5);
    editor.reset_position();
    assert_eq!(editor.transformation().scale, 0.75);
    assert_eq!(editor.transformation().offset(), Point::new(400.0, 250.0));

    // Export writes a mask-sized PNG
    let path = std::env::temp_dir().join(format!("stencil-session-{}.png", std::process::id()));
    editor.export_to(&path).unwrap();
    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (400, 300));
    let _ = std::fs::remove_file(&path);

    // Removing the image restores the initial state exactly
    editor.set_zoom(1.5);
    editor.remove_image();
    assert_eq!(*editor.state(), EditorState::default());

    let notices = editor.take_notices();
    assert_eq!(notices.first().map(|n| n.level), Some(NoticeLevel::Error));
    assert!(notices.iter().any(|n| n.message == "Image loaded successfully"));
    assert!(notices.iter().any(|n| n.message == "Image reset to original position"));
    assert_eq!(notices.last().map(|n| n.message.as_str()), Some("Image removed"));
}

#[test]
fn store_subscribers_follow_editor_actions() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let mut editor = Editor::default();
    let scales = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&scales);
    editor
        .store_mut()
        .subscribe(move |state| sink.borrow_mut().push(state.transformations.scale));

    editor
        .begin_upload(UploadFile::from_bytes("square.png", "image/png", png(300, 300)))
        .unwrap();
    editor.wait_upload();

    // Square image on a 400x300 mask fits at 400/300
    let fit = 400.0 / 300.0;
    assert!(scales.borrow().iter().any(|s| (s - fit).abs() < 1e-5));
    assert!((editor.transformation().scale - fit).abs() < 1e-5);
}
