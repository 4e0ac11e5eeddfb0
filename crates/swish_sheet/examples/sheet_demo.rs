//! Headless walkthrough of a full sheet session
//!
//! Runs the open motion, a drag that settles back, and a drag that commits
//! to closing, printing the frame samples a presentation layer would
//! render. Run with `RUST_LOG=debug` to see the lifecycle decisions.

use swish_sheet::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn drive(provider: &SheetProvider, label: &str) {
    let mut frames = 0u32;
    loop {
        let animating = provider.advance(FRAME);
        frames += 1;
        if frames % 10 == 0 || !animating {
            let frame = provider.frame();
            println!(
                "{label:>8} frame {frames:>3}: progress {:>6.1}  drag {:>6.2}  translate_y {:>7.2}  backdrop {:.2}",
                frame.progress, frame.drag_offset, frame.translate_y, frame.backdrop_opacity
            );
        }
        if !animating {
            break;
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let provider = SheetProvider::new(
        ProviderConfig {
            close: Some(CloseConfig::new("Cancel")),
            ..Default::default()
        },
        800.0,
    );
    let handle = provider.handle();

    handle
        .show(
            ShowProperties::new()
                .header("Share this photo")
                .action(Action::new("Copy link", || println!(">> copy link")))
                .action(Action::new("Save to library", || println!(">> saved")))
                .action(Action::new("Delete", || println!(">> deleted")).color("#ff3b30")),
        )
        .unwrap();

    println!("-- opening --");
    drive(&provider, "open");
    println!("state: {:?}", handle.state().unwrap());

    // The presentation layer measures the sheet after first layout
    provider.controller().lock().unwrap().on_layout(320.0);

    println!("-- drag released below the commit threshold --");
    {
        let controller = provider.controller();
        let mut controller = controller.lock().unwrap();
        for translation in [0.0, 25.0, 55.0, 80.0] {
            controller.on_gesture_update(GestureSample::new(translation));
        }
        let end = controller.on_gesture_end(GestureSample::new(80.0));
        println!("release at 80 -> {end:?}");
    }
    drive(&provider, "settle");
    println!("state: {:?}", handle.state().unwrap());

    println!("-- drag past the commit threshold --");
    {
        let controller = provider.controller();
        let mut controller = controller.lock().unwrap();
        for translation in [0.0, 40.0, 90.0, 140.0] {
            controller.on_gesture_update(GestureSample::new(translation));
        }
        let end = controller.on_gesture_end(GestureSample::new(140.0));
        println!("release at 140 -> {end:?}");
    }
    drive(&provider, "close");
    println!("state: {:?}", handle.state().unwrap());
}
