//! Test fixtures: small text-only invoices rendered to real PDFs.

#![allow(dead_code)]

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::encryption::{decrypt_object, get_encryption_key};
use lopdf::{Document, Object, Stream, StringFormat, dictionary};

/// Vertical distance between rendered lines, large enough for the text
/// extractor to break lines.
const LINE_SPACING: i64 = 20;

/// Render pages of text lines into PDF bytes (Courier 9pt, one line per row).
pub fn pdf(pages: &[&str]) -> Vec<u8> {
    save(document(pages))
}

/// Render pages and encrypt their content with RC4 under an empty user
/// password.
///
/// With `wrong_password` the encryption dictionary carries a /U entry that
/// the empty password does not satisfy.
pub fn encrypted_pdf(pages: &[&str], wrong_password: bool) -> Vec<u8> {
    let mut doc = document(pages);

    let mut encrypt = dictionary! {
        "Filter" => "Standard",
        "V" => 2,
        "R" => 3,
        "Length" => 128,
        "O" => Object::String(vec![0x5a; 32], StringFormat::Hexadecimal),
        "P" => -4,
        "CF" => dictionary! {
            "StdCF" => dictionary! { "CFM" => "V2" },
        },
    };
    if wrong_password {
        encrypt.set("U", Object::String(vec![0; 32], StringFormat::Hexadecimal));
    }
    let encrypt_id = doc.add_object(encrypt);
    doc.trailer.set("Encrypt", encrypt_id);
    let file_id = Object::String(b"fuelx-fixture".to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    // RC4 is symmetric: "decrypting" plain content yields the ciphertext
    let key = get_encryption_key(&doc, "", false).expect("encryption key");
    let streams: Vec<_> = doc
        .objects
        .iter()
        .filter(|(_, object)| matches!(object, Object::Stream(_)))
        .map(|(id, _)| *id)
        .collect();
    for id in streams {
        let sealed = decrypt_object(&key, id, doc.get_object(id).expect("stream"), false)
            .expect("encrypt stream");
        if let Ok(Object::Stream(stream)) = doc.get_object_mut(id) {
            stream.set_content(sealed);
        }
    }

    save(doc)
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn document(pages: &[&str]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 9.into()]),
            Operation::new("Td", vec![20.into(), 800.into()]),
        ];
        for line in text.lines() {
            operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-LINE_SPACING).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Day the fixtures are validated against.
pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).unwrap()
}

pub const IP_INVOICE: &str = "\
IP PLUS S.R.L.
Fattura Nr: 2500123 Data: 15/10/2025
01/10/25 08:15 12345678 00123 ROMA VIA SALARIA 123.456 0000 GASOLIO SELF 45,20 1,789 80,86
03/10/25 17:40 12345690 00456 RIETI 123.980 0000 GASOLIO 30,00 1,850 55,50
TARGA AB123CD
05/10/25 09:05 12345702 00123 ROMA VIA SALARIA 1 0000 GASOLIO SELF 20,00 1,789 35,78
TARGA EF456GH
Totale Importo: EUR 171,14";

pub const ESSO_INVOICE: &str = "\
WEX Europe Services S.r.l. - ESSO CARD
Fattura No : 00573119 Data : 15.10.2025
Carta: 078 FH682DD 7033166200912540788
07.10.25 000412 367030 CITTADUCALE gasolio autotrazion 26,58 42,50 1,599 42,50
08.10.25 000413 367031 RIETI 125000 gasolio autotrazione 40,00 64,00 1,600 64,00
TOTALE: 87,30 19,20 106,50";

pub const Q8_SUMMARY: &str = "\
Kuwait Petroleum Italia S.p.A. - CartissimaQ8
Fattura n. PJ10575389 del 05/10/25
BASE IMPONIBILE IVA TOTALE TOTALE FATTURA
110,66 24,34 135,00";

pub const Q8_DETAIL: &str = "\
7028009864300015041 00002 02/10/25 0852 GLS 0000 000001 5817 LOC.ACQUAVIVA S.S. 4 NEROLA SF 75,00 45,76 1,639 0,000 1,639 75,00
7028009864300015041 00003 04/10/25 1310 HBZ 0000 000001 6120 MONTEROTONDO SV 60,00 32,43 1,850 0,000 1,850 60,00
* TOTALE PAN 7028009864300015041 TARGA/NOME EL934BA ****";

pub const TAMOIL_INVOICE: &str = "\
TAMOIL ITALIA S.p.A. - mycard
Fattura N. 25FE012345 Data fattura 15/10/2025
S 8478 SACROFANO (RM) 674676 01/10/2025 09:55 1 Gasolio Self LT 61,92 101,49
Totale Carta 7083651392996570 Targa FK444ZJ
Totale Fattura EUR 101,49";

pub fn ip_pdf() -> Vec<u8> {
    pdf(&[IP_INVOICE])
}

pub fn esso_pdf() -> Vec<u8> {
    pdf(&[ESSO_INVOICE])
}

pub fn q8_pdf() -> Vec<u8> {
    pdf(&[Q8_SUMMARY, "Condizioni generali di contratto", Q8_DETAIL])
}

pub fn tamoil_pdf() -> Vec<u8> {
    pdf(&[TAMOIL_INVOICE])
}
