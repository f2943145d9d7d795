use chrono::{DateTime, FixedOffset};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use facturacr::core::*;
use facturacr::xml;

fn test_date() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-06-15T10:30:00-06:00").unwrap()
}

fn build_invoice(lines: u32) -> Document {
    let items: Vec<Item> = (1..=lines)
        .map(|i| {
            ItemBuilder::new(i, format!("Artículo {i}"), dec!(5), "Unid", dec!(1200))
                .tax(Tax::levied("01", dec!(13), dec!(6000)))
                .build()
        })
        .collect();

    let mut builder = DocumentBuilder::invoice(1, test_date())
        .issuer(
            IssuerBuilder::new(
                "Distribuidora Central S.A.",
                IdentificationDocument::new("02", "3101654321").unwrap(),
                Location::new("1", "01", "08", "Zona Industrial de Pavas"),
                "facturacion@central.cr",
            )
            .build(),
        )
        .receiver(
            ReceiverBuilder::new("Supermercado La Unión")
                .identification(IdentificationDocument::new("02", "3101987654").unwrap())
                .build(),
        )
        .condition("01")
        .payment_type("04")
        .situation("1")
        .security_code("55667788")
        .summary(Summary::from_items(&items))
        .regulation(Regulation::default());

    for item in items {
        builder = builder.add_item(item);
    }
    builder.build()
}

fn bench_validate(c: &mut Criterion) {
    let doc = build_invoice(10);
    c.bench_function("validate_10_lines", |b| {
        b.iter(|| black_box(black_box(&doc).validate()));
    });
}

fn bench_key(c: &mut Criterion) {
    let doc = build_invoice(10);
    c.bench_function("derive_key", |b| {
        b.iter(|| black_box(black_box(&doc).key()));
    });
}

fn bench_xml_10_lines(c: &mut Criterion) {
    let doc = build_invoice(10);
    c.bench_function("xml_10_lines", |b| {
        b.iter(|| black_box(xml::to_xml(black_box(&doc))));
    });
}

fn bench_xml_1000_lines(c: &mut Criterion) {
    let doc = build_invoice(1000);
    c.bench_function("xml_1000_lines", |b| {
        b.iter(|| black_box(xml::to_xml(black_box(&doc))));
    });
}

fn bench_read_identifications(c: &mut Criterion) {
    let rendered = xml::to_xml(&build_invoice(100)).unwrap();
    c.bench_function("read_identifications_100_lines", |b| {
        b.iter(|| black_box(xml::read_identifications(black_box(&rendered))));
    });
}

criterion_group!(
    benches,
    bench_validate,
    bench_key,
    bench_xml_10_lines,
    bench_xml_1000_lines,
    bench_read_identifications,
);
criterion_main!(benches);
