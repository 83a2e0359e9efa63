use rand::Rng;
use std::io::Error;
use std::path::Path;

#[allow(dead_code)]
pub fn write_products(path: &Path, rows: &[(&str, &str, &str, u32)]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["name", "price", "cost", "quantity", "description"])?;
    for &(name, price, cost, quantity) in rows {
        let quantity = quantity.to_string();
        wtr.write_record([name, price, cost, quantity.as_str(), ""])?;
    }
    wtr.flush()?;
    Ok(())
}

#[allow(dead_code)]
pub fn write_sales(path: &Path, rows: &[(&str, u32, u32)]) -> Result<(), Error> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    wtr.write_record(["sale", "product", "quantity"])?;
    for &(sale, product, quantity) in rows {
        wtr.write_record([sale, product.to_string().as_str(), quantity.to_string().as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// A plausible Thai number: local mobile form, international form, or a 13-digit id.
#[allow(dead_code)]
pub fn random_identifier<R: Rng>(rng: &mut R) -> String {
    let digits = |rng: &mut R, n: usize| -> String {
        (0..n).map(|_| char::from(b'0' + rng.gen_range(0..10))).collect()
    };
    match rng.gen_range(0..3) {
        0 => format!("0{}{}", rng.gen_range(6..10), digits(rng, 8)),
        1 => format!("66{}{}", rng.gen_range(6..10), digits(rng, 8)),
        _ => format!("{}{}", rng.gen_range(1..10), digits(rng, 12)),
    }
}
