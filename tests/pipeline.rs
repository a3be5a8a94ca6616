use pixelmagic::{
    AlphaChannel, AlphaEstimator, ColorLayout, CropRect, EmbeddedAlpha, Error, FitMode, OutputFormat, PixelBuffer,
    ResizeSpec, SoftnessParams, Staging, StagingConfig, UnsharpMask, UpscaleSpec, Upscaler, crop,
    crop_staged, decode, encode, process_resize, refine, remove_background,
    remove_background_staged, resize, resize_staged, upscale, upscale_staged,
};

/// Helper: deterministic RGB test card with gradients and a hard edge.
fn test_card(width: u32, height: u32, layout: ColorLayout) -> PixelBuffer {
    let channels = layout.channels();
    let mut samples = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = if x < width / 2 { 40 } else { 210 };
            let px = [r, g, b, 255];
            samples.extend_from_slice(&px[..channels.min(3)]);
            if channels == 4 {
                samples.push(px[3]);
            }
        }
    }
    PixelBuffer::new(width, height, layout, samples).unwrap()
}

fn staging(root: &std::path::Path) -> Staging {
    Staging::open(StagingConfig {
        upload_dir: root.join("uploads"),
        processed_dir: root.join("processed"),
        ..StagingConfig::default()
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// End-to-end scenarios
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_crop_opaque_rgb() {
    let image = PixelBuffer::filled(100, 100, ColorLayout::Rgb, &[90, 140, 200]).unwrap();
    let cropped = crop(&image, CropRect::new(10, 10, 50, 50)).unwrap();
    assert_eq!(cropped.dimensions(), (50, 50));
    assert_eq!(cropped.layout(), ColorLayout::Rgb);
    assert!(!cropped.has_alpha());
}

#[test]
fn scenario_b_mid_alpha_is_untouched_without_softness() {
    let image = PixelBuffer::filled(100, 100, ColorLayout::Rgba, &[1, 2, 3, 128]).unwrap();
    let raw = EmbeddedAlpha.estimate_alpha(&image).unwrap();
    let refined = refine(&image, &raw, SoftnessParams::new(0, 0)).unwrap();
    assert!(refined.samples().all(|v| v == 128));
}

#[test]
fn scenario_c_upscale_survives_failing_unsharp_mask() {
    let image = test_card(10, 10, ColorLayout::Rgb);
    let out = upscale(&image, &UpscaleSpec::new(2)).unwrap();
    assert_eq!(out.dimensions(), (20, 20));

    let broken = Upscaler::default().with_unsharp(UnsharpMask {
        radius: f32::INFINITY,
        amount: 0.4,
    });
    let out = broken.upscale(&image, &UpscaleSpec::new(2)).unwrap();
    assert_eq!(out.dimensions(), (20, 20));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn crop_past_right_edge_always_fails() {
    let image = test_card(30, 20, ColorLayout::Rgb);
    for x in 0..30 {
        let rect = CropRect::new(x, 0, 31 - x, 5);
        assert!(matches!(
            crop(&image, rect),
            Err(Error::InvalidCropBounds { .. })
        ));
    }
}

#[test]
fn cover_and_contain_dimension_guarantees() {
    let image = test_card(64, 36, ColorLayout::Rgba);
    for (w, h) in [(32, 32), (100, 20), (7, 50), (64, 36)] {
        let cover = ResizeSpec::new(w, h, FitMode::Cover, OutputFormat::Png, 90).unwrap();
        assert_eq!(resize(&image, &cover).unwrap().dimensions(), (w, h));

        let contain = ResizeSpec::new(w, h, FitMode::Contain, OutputFormat::Png, 90).unwrap();
        let (cw, ch) = resize(&image, &contain).unwrap().dimensions();
        assert!(cw <= w && ch <= h);
        let expected_h = f64::from(cw) * 36.0 / 64.0;
        assert!((expected_h - f64::from(ch)).abs() <= 1.0, "{cw}x{ch} for {w}x{h}");
    }
}

#[test]
fn upscale_preserves_resampled_alpha() {
    let mut image = test_card(12, 8, ColorLayout::Rgba).into_array();
    for ((y, x, c), v) in image.indexed_iter_mut() {
        if c == 3 {
            *v = if (x + y) % 3 == 0 { 0 } else { 255 };
        }
    }
    let image = PixelBuffer::from_array(image).unwrap();
    let out = upscale(&image, &UpscaleSpec::new(2)).unwrap();
    assert_eq!(out.dimensions(), (24, 16));
    let expected =
        pixelmagic::core::processing::resize::resample_alpha(&image.alpha().unwrap(), 24, 16)
            .unwrap();
    assert_eq!(out.alpha().unwrap(), expected);
}

#[test]
fn upscale_by_three_is_unsupported() {
    let image = test_card(5, 5, ColorLayout::Rgb);
    assert!(matches!(
        upscale(&image, &UpscaleSpec::new(3)),
        Err(Error::UnsupportedScale { scale: 3 })
    ));
}

#[test]
fn feathering_expands_visible_silhouette() {
    let image = test_card(30, 30, ColorLayout::Rgb);
    let mut samples = vec![0u8; 30 * 30];
    for y in 10..20 {
        for x in 10..20 {
            samples[y * 30 + x] = 255;
        }
    }
    let raw = AlphaChannel::new(30, 30, samples).unwrap();
    let plain = refine(&image, &raw, SoftnessParams::new(0, 0)).unwrap();
    let feathered = refine(&image, &raw, SoftnessParams::new(0, 3)).unwrap();
    let visible = |a: &AlphaChannel| a.samples().filter(|&v| v > 0).count();
    assert!(visible(&feathered) > visible(&plain));
    assert!(feathered.get(9, 15) > 0);
}

// ---------------------------------------------------------------------------
// Encoded and staged flows
// ---------------------------------------------------------------------------

#[test]
fn jpeg_resize_flattens_alpha() {
    let image = test_card(40, 30, ColorLayout::Rgba);
    let png = encode(&image, OutputFormat::Png, 90).unwrap();
    let spec = ResizeSpec::new(20, 20, FitMode::Cover, OutputFormat::Jpeg, 75).unwrap();
    let out = process_resize(&png, &spec).unwrap();
    assert_eq!((out.width, out.height), (20, 20));
    let decoded = decode(&out.bytes).unwrap();
    assert_eq!(decoded.layout(), ColorLayout::Rgb);
    assert_eq!(decoded.dimensions(), (20, 20));
}

#[test]
fn staged_operations_chain_through_handles() {
    let dir = tempfile::tempdir().unwrap();
    let staging = staging(dir.path());
    let png = encode(&test_card(48, 32, ColorLayout::Rgb), OutputFormat::Png, 90).unwrap();
    let uploaded = staging.upload(&png, "card.png").unwrap();

    let cropped = crop_staged(&staging, &uploaded.filename, CropRect::new(8, 0, 32, 32)).unwrap();
    assert!(cropped.filename.starts_with("cropped_"));
    assert_eq!((cropped.width, cropped.height), (32, 32));

    let spec = ResizeSpec::new(16, 16, FitMode::Stretch, OutputFormat::Jpeg, 80).unwrap();
    let resized = resize_staged(&staging, &cropped.filename, &spec).unwrap();
    assert!(resized.filename.starts_with("resized_") && resized.filename.ends_with(".jpg"));

    let upscaled = upscale_staged(&staging, &resized.filename, &UpscaleSpec::new(4)).unwrap();
    assert!(upscaled.filename.starts_with("upscaled_4x_"));
    assert_eq!((upscaled.width, upscaled.height), (64, 64));
    assert_eq!(staging.load(&upscaled.filename).unwrap().dimensions(), (64, 64));
}

#[test]
fn staged_background_removal_writes_rgba_png() {
    let dir = tempfile::tempdir().unwrap();
    let staging = staging(dir.path());
    let png = encode(&test_card(16, 16, ColorLayout::Rgb), OutputFormat::Png, 90).unwrap();
    let uploaded = staging.upload(&png, "card.png").unwrap();

    let oracle = |img: &PixelBuffer| -> pixelmagic::Result<AlphaChannel> {
        let samples = (0..img.width() * img.height())
            .map(|i| if i % img.width() < img.width() / 2 { 10 } else { 240 })
            .collect();
        AlphaChannel::new(img.width(), img.height(), samples)
    };
    let out = remove_background_staged(
        &staging,
        &uploaded.filename,
        &oracle,
        SoftnessParams::new(1, 1),
    )
    .unwrap();
    assert!(out.filename.starts_with("bg_removed_") && out.filename.ends_with(".png"));

    let result = staging.load(&out.filename).unwrap();
    assert_eq!(result.layout(), ColorLayout::Rgba);
    assert_eq!(result.pixel(0, 8)[3], 0);
    assert_eq!(result.pixel(15, 8)[3], 255);
}

#[test]
fn oracle_with_wrong_dimensions_is_a_mismatch() {
    let image = test_card(10, 10, ColorLayout::Rgb);
    let oracle = |_: &PixelBuffer| -> pixelmagic::Result<AlphaChannel> {
        Ok(AlphaChannel::filled(5, 5, 255))
    };
    assert!(matches!(
        remove_background(&image, &oracle, SoftnessParams::default()),
        Err(Error::DimensionMismatch { .. })
    ));
}
