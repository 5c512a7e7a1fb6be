// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::invoice::{InvoiceDetail, InvoiceStatus},
    services::sales_service::SalesService,
};

pub const FONT_FAMILY: &str = "Roboto";
const STORE_NAME: &str = "INVENTORY";

#[derive(Clone)]
pub struct DocumentService {
    sales: SalesService,
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(sales: SalesService, fonts_dir: String) -> Self {
        Self { sales, fonts_dir }
    }

    pub async fn generate_invoice_pdf(&self, invoice_id: Uuid) -> Result<Vec<u8>, AppError> {
        let detail = self.sales.get_invoice(invoice_id).await?;
        let fonts_dir = self.fonts_dir.clone();

        // genpdf é síncrono e faz IO das fontes
        tokio::task::spawn_blocking(move || render_invoice_pdf(&detail, &fonts_dir))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de PDF: {}", e))?
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

/// Fatura em PDF: cabeçalho, cliente, itens, totais e QR code com o número do pedido.
pub fn render_invoice_pdf(detail: &InvoiceDetail, fonts_dir: &str) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, FONT_FAMILY, None)
        .map_err(|_| AppError::FontNotFound(format!("{}/{}-*.ttf", fonts_dir, FONT_FAMILY)))?;

    let header = &detail.header;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("Invoice {}", header.order_number));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    doc.push(elements::Paragraph::new(STORE_NAME).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Break::new(1.5));

    doc.push(
        elements::Paragraph::new(format!("INVOICE {}", header.order_number))
            .styled(style::Style::new().bold().with_font_size(14)),
    );
    doc.push(elements::Paragraph::new(format!(
        "Date: {}",
        header.created_at.format("%d/%m/%Y %H:%M")
    )));
    doc.push(elements::Paragraph::new(format!(
        "Customer: {}",
        header.customer_name.as_deref().unwrap_or("Walk-in customer")
    )));
    if header.status == InvoiceStatus::Cancelled {
        doc.push(elements::Paragraph::new("CANCELLED").styled(style::Style::new().bold().with_font_size(12)));
    }

    doc.push(elements::Break::new(2));

    // Pesos das colunas: Produto (4), Qtd (1), Unitário (2), Total (2)
    let mut table = elements::TableLayout::new(vec![4, 1, 2, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Product").styled(bold))
        .element(elements::Paragraph::new("Qty").styled(bold))
        .element(elements::Paragraph::new("Unit price").styled(bold))
        .element(elements::Paragraph::new("Total").styled(bold))
        .push()
        .map_err(pdf_error)?;

    for item in &detail.items {
        table
            .row()
            .element(elements::Paragraph::new(item.product_name.clone()))
            .element(elements::Paragraph::new(item.quantity.to_string()))
            .element(elements::Paragraph::new(format!("{:.2}", item.unit_price)))
            .element(elements::Paragraph::new(format!("{:.2}", item.line_total)))
            .push()
            .map_err(pdf_error)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    for (label, value, size) in [
        ("Subtotal", header.subtotal, 10),
        ("VAT 7%", header.vat_amount, 10),
        ("TOTAL", header.total, 12),
    ] {
        let mut paragraph = elements::Paragraph::new(format!("{}: {:.2}", label, value));
        paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(paragraph.styled(style::Style::new().bold().with_font_size(size)));
    }

    doc.push(elements::Break::new(2));

    let code = QrCode::new(header.order_number.as_bytes()).map_err(pdf_error)?;
    let image_buffer = code.render::<Luma<u8>>().build();
    let pdf_image = elements::Image::from_dynamic_image(image::DynamicImage::ImageLuma8(image_buffer))
        .map_err(pdf_error)?
        .with_scale(genpdf::Scale::new(0.5, 0.5));
    doc.push(pdf_image);

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::Invoice;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn missing_fonts_are_reported() {
        let detail = InvoiceDetail {
            header: Invoice {
                id: Uuid::new_v4(),
                order_number: "INV-000001".into(),
                customer_id: None,
                customer_name: None,
                sales_account_id: None,
                subtotal: Decimal::new(100, 0),
                vat_amount: Decimal::new(7, 0),
                total: Decimal::new(107, 0),
                status: InvoiceStatus::Completed,
                created_at: Utc::now(),
                cancelled_at: None,
            },
            items: vec![],
        };

        let err = render_invoice_pdf(&detail, "/nonexistent/fonts").unwrap_err();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
