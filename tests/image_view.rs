use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use imgview::{
    Color, DispatchConfig, Dispatcher, Error, Image, ImageView, SolidResult, ViewRect,
};

const WAIT: Duration = Duration::from_secs(30);

/// Run `is_solid` and collect every continuation call.
fn solid_async(view: &ImageView) -> SolidResult {
    let calls = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();
    {
        let calls = Arc::clone(&calls);
        view.is_solid(move |result| {
            calls.fetch_add(1, Ordering::SeqCst);
            tx.send(result).unwrap();
        });
    }
    let result = rx.recv_timeout(WAIT).unwrap().unwrap();
    // the continuation owned the only sender
    assert!(rx.recv().is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    result
}

fn stripes(width: u32, height: u32) -> Image {
    let mut img = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let c = if (x / 4) % 2 == 0 { Color::WHITE } else { Color::rgb(200, 30, 30) };
            img.set_pixel(x, y, c).unwrap();
        }
    }
    img
}

#[test]
fn fresh_image_is_transparent_black() {
    let img = Image::new(256, 256);
    let view = img.view(0, 0, 256, 256);
    let result = view.is_solid_sync();
    assert_eq!(result, SolidResult::Uniform(Color::new(0, 0, 0, 0)));
    assert!(result.is_solid());
    assert_eq!(result.color(), Some(Color::TRANSPARENT));
}

#[test]
fn filled_images_are_uniform() {
    for color in [Color::new(2, 2, 2, 2), "white".parse().unwrap()] {
        let mut img = Image::new(256, 256);
        img.fill(color);
        let view = img.view(0, 0, 256, 256);
        assert_eq!(view.is_solid_sync(), SolidResult::Uniform(color));
        assert_eq!(view.pixel(0, 0), Some(color));
    }
}

#[test]
fn far_out_of_bounds_pixel_is_none() {
    let img = Image::new(256, 256);
    let view = img.view(0, 0, 256, 256);
    assert_eq!(view.pixel(99_999_999, 9_999_999), None);
    assert_eq!(view.pixel(255, 255), Some(Color::TRANSPARENT));
    assert_eq!(view.pixel(256, 0), None);
}

#[test]
fn async_solid_and_varied() {
    let mut img = Image::new(64, 64);
    img.fill(Color::rgb(10, 20, 30));
    assert_eq!(
        solid_async(&img.view(0, 0, 64, 64)),
        SolidResult::Uniform(Color::rgb(10, 20, 30))
    );

    let varied = solid_async(&stripes(64, 64).view(0, 0, 64, 64));
    assert_eq!(varied, SolidResult::Varied);
    assert_eq!(varied.color(), None);
}

#[test]
fn solid_inside_a_varied_image() {
    let img = stripes(32, 8);
    // one 4-pixel stripe
    let view = img.view(4, 0, 4, 8);
    assert_eq!(view.is_solid_sync(), SolidResult::Uniform(Color::rgb(200, 30, 30)));
    assert_eq!(solid_async(&view), SolidResult::Uniform(Color::rgb(200, 30, 30)));
    assert_eq!(img.view(3, 0, 2, 1).is_solid_sync(), SolidResult::Varied);
}

#[test]
fn repeated_scans_agree() {
    let img = stripes(40, 40);
    let view = img.view(0, 0, 40, 40);
    let first = view.is_solid_sync();
    for _ in 0..5 {
        assert_eq!(view.is_solid_sync(), first);
        assert_eq!(view.is_solid_task().wait().unwrap(), first);
    }
}

#[cfg(feature = "png")]
#[test]
fn decoded_image_is_varied() {
    let bytes = stripes(24, 12).encode("png").unwrap().into_vec();
    let img = Image::decode(&bytes).unwrap();
    let view = img.view(0, 0, img.width(), img.height());
    assert_eq!(view.is_solid_sync(), SolidResult::Varied);
    assert_eq!(solid_async(&view), SolidResult::Varied);
}

#[cfg(feature = "png")]
#[test]
fn opened_file_is_varied() {
    let path = std::env::temp_dir().join(format!("imgview-stripes-{}.png", std::process::id()));
    stripes(24, 12).encode("png").unwrap().save(&path).unwrap();
    let opened = Image::open(&path);
    std::fs::remove_file(&path).unwrap();
    let img = opened.unwrap();
    assert_eq!((img.width(), img.height()), (24, 12));

    let view = img.view(0, 0, img.width(), img.height());
    assert_eq!(view.is_solid_sync(), SolidResult::Varied);
    assert_eq!(solid_async(&view), SolidResult::Varied);
    assert_eq!(view.is_solid_task().wait().unwrap(), SolidResult::Varied);
    // a single stripe of the loaded image is still uniform
    assert_eq!(
        img.view(4, 0, 4, 12).is_solid_sync(),
        SolidResult::Uniform(Color::rgb(200, 30, 30))
    );
}

#[cfg(feature = "webp")]
#[test]
fn webp_of_image_and_view() {
    let img = stripes(32, 16);
    let full = img.encode("webp").unwrap();
    assert!(!full.is_empty());
    assert_eq!(full.decode().unwrap().as_slice(), img.as_slice());

    let view = img.view(2, 3, 10, 5);
    let (tx, rx) = mpsc::channel();
    view.encode("webp", move |result| tx.send(result).unwrap());
    let out = rx.recv_timeout(WAIT).unwrap().unwrap();
    assert!(rx.recv().is_err());
    assert!(!out.is_empty());
    let decoded = out.decode().unwrap();
    assert_eq!((decoded.width(), decoded.height()), (10, 5));
    assert_eq!(decoded.as_slice(), view.to_image().as_slice());
}

#[cfg(feature = "png")]
#[test]
fn view_encode_matches_full_image_pixels() {
    let img = stripes(20, 20);
    let view = img.view(5, 5, 100, 100);
    let decoded = view.encode_task("png").wait().unwrap().decode().unwrap();
    assert_eq!((decoded.width(), decoded.height()), (15, 15));
    for y in 0..15 {
        for x in 0..15 {
            assert_eq!(decoded.pixel(x, y), img.pixel(x + 5, y + 5));
        }
    }
}

#[test]
fn unsupported_format_goes_to_continuation() {
    let img = Image::new(8, 8);
    let view = img.view(0, 0, 8, 8);
    let (tx, rx) = mpsc::channel();
    view.encode("foo", move |result| tx.send(result).unwrap());
    match rx.recv_timeout(WAIT).unwrap() {
        Err(Error::UnsupportedFormat(name)) => assert_eq!(name, "foo"),
        other => panic!("expected unsupported format, got {other:?}"),
    }
    assert!(rx.recv().is_err());
}

#[test]
fn construction_rejects_bad_arguments() {
    let img = Image::new(4, 4);
    for bad in ["", "0", "0,0,1", "0,0,1,1,1", "x,0,1,1", "0,0,-1,1", "-5,0,1,1"] {
        assert!(
            matches!(bad.parse::<ViewRect>(), Err(Error::InvalidArgument(_))),
            "{bad:?}"
        );
    }
    assert!(matches!(
        ImageView::try_new(&img, 0, -1, 1, 1),
        Err(Error::InvalidArgument(_))
    ));
    let rect: ViewRect = "1,1,2,2".parse().unwrap();
    let view = ImageView::from_rect(&img, rect);
    assert_eq!((view.x(), view.y(), view.width(), view.height()), (1, 1, 2, 2));
}

#[test]
fn empty_and_straddling_views() {
    let mut img = Image::new(16, 16);
    img.fill(Color::BLACK);
    img.set_pixel(0, 0, Color::WHITE).unwrap();

    for view in empty_views(&img) {
        assert_eq!(view.is_solid_sync(), SolidResult::Empty);
        assert_eq!(solid_async(&view), SolidResult::Empty);
    }

    let straddling = img.view(12, 12, 10, 10);
    assert_eq!(straddling.is_solid_sync(), SolidResult::Uniform(Color::BLACK));
    assert_eq!(img.view(0, 0, 2, 2).is_solid_sync(), SolidResult::Varied);
}

fn empty_views(img: &Image) -> [ImageView; 3] {
    [img.view(16, 0, 4, 4), img.view(0, 0, 0, 0), img.view(3, 3, 4, 0)]
}

#[cfg(feature = "png")]
#[test]
fn empty_view_encode_is_empty_region() {
    let img = Image::new(16, 16);
    for view in empty_views(&img) {
        let rect = view.rect();
        match view.encode_task("png").wait() {
            Err(Error::EmptyRegion { x, y, width, height }) => {
                assert_eq!(ViewRect::new(x, y, width, height), rect);
            }
            other => panic!("expected an empty region error for {rect}, got {other:?}"),
        }
    }
    // sync path reports the same
    assert!(matches!(
        img.view(20, 20, 1, 1).encode_sync("png"),
        Err(Error::EmptyRegion { .. })
    ));
}

#[test]
fn dedicated_dispatcher() {
    let dispatcher = Dispatcher::new(
        &DispatchConfig::new()
            .with_num_threads(Some(2))
            .with_thread_name("view-workers"),
    )
    .unwrap();
    let img = stripes(16, 16);
    let view = img.view(0, 0, 4, 16).with_dispatcher(dispatcher);

    let (tx, rx) = mpsc::channel();
    view.is_solid(move |result| {
        let name = std::thread::current().name().map(str::to_owned);
        tx.send((result, name)).unwrap();
    });
    let (result, name) = rx.recv_timeout(WAIT).unwrap();
    assert_eq!(result.unwrap(), SolidResult::Uniform(Color::WHITE));
    assert!(name.unwrap().starts_with("view-workers-"));
}

#[test]
fn concurrent_views_of_one_image() {
    let img = stripes(64, 64);
    let tasks: Vec<_> = (0..16)
        .map(|i| img.view(i * 4, 0, 4, 64).is_solid_task())
        .collect();
    for (i, task) in tasks.into_iter().enumerate() {
        let expected = if i % 2 == 0 { Color::WHITE } else { Color::rgb(200, 30, 30) };
        assert_eq!(task.wait().unwrap(), SolidResult::Uniform(expected));
    }
}
