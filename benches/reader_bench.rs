use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pullxml::{Element, Reader, Writer};

const BOOK: &str = r#"
  <book category="WEB">
    <title lang="en">XQuery Kick Start</title>
    <author>James McGovern</author>
    <author>Per Bothner</author>
    <year>2003</year>
    <price>49.99</price>
  </book>"#;

fn generate_bookstore(books: usize) -> Vec<u8> {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<bookstore>");
    for _ in 0..books {
        xml.push_str(BOOK);
    }
    xml.push_str("\n</bookstore>\n");
    xml.into_bytes()
}

#[derive(Default)]
struct Book {
    category: String,
    title: String,
    author: String,
    year: String,
    price: String,
}

fn bench_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("next");

    for books in [10usize, 1000] {
        let doc = generate_bookstore(books);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(books), &doc, |b, doc| {
            b.iter(|| {
                let mut reader = Reader::new(doc.as_slice());
                let mut count = 0usize;
                while reader.next() {
                    count += 1;
                }
                black_box(count);
            });
        });
    }

    group.finish();
}

fn bench_assign_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("assign_next");

    for books in [10usize, 1000] {
        let doc = generate_bookstore(books);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(books), &doc, |b, doc| {
            b.iter(|| {
                let mut reader = Reader::new(doc.as_slice());
                let mut book = Book::default();
                let mut count = 0usize;
                while reader.next() {
                    let field = match reader.element() {
                        Some(Element::Start(start)) => match start.name() {
                            b"book" => {
                                book.category.clear();
                                book.category
                                    .push_str(start.attrs().get_str("category").unwrap_or_default());
                                count += 1;
                                None
                            }
                            b"title" => Some(&mut book.title),
                            b"author" => Some(&mut book.author),
                            b"year" => Some(&mut book.year),
                            b"price" => Some(&mut book.price),
                            _ => None,
                        },
                        _ => None,
                    };
                    if let Some(field) = field {
                        reader.assign_next(field);
                    }
                }
                black_box((count, &book.title, &book.price));
            });
        });
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let doc = generate_bookstore(100);
    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(doc.len() as u64));
    group.bench_function("copy", |b| {
        b.iter(|| {
            let mut reader = Reader::new(doc.as_slice());
            let mut writer = Writer::new(Vec::with_capacity(doc.len()));
            while reader.next() {
                if let Some(element) = reader.element() {
                    writer.write(element).unwrap();
                }
            }
            black_box(writer.into_inner().len());
        });
    });
    group.finish();
}

criterion_group!(benches, bench_next, bench_assign_next, bench_write);
criterion_main!(benches);
