use crate::domain::errors::{DomainError, DomainResult};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// 二维码图片最小边长（像素）
const QR_CODE_SIZE: u32 = 300;

/// 把二维码内容渲染为 PNG 图片
pub fn render_png(content: &str) -> DomainResult<Vec<u8>> {
    let code = QrCode::new(content.as_bytes())
        .map_err(|e| DomainError::QrCodeError(format!("Failed to encode content: {}", e)))?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_CODE_SIZE, QR_CODE_SIZE)
        .build();

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image)
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| DomainError::QrCodeError(format!("Failed to write png: {}", e)))?;

    Ok(buffer.into_inner())
}
