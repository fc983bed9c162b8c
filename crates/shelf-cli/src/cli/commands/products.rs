//! `shelf products`: one page, printed as a table.

use anyhow::{Context, Result};
use shelf_core::Config;
use shelf_core::api::ApiClient;
use shelf_core::catalog::{
    FetchKey, PageWindow, Product, ProductSource, SortField, SortOrder, SortSpec,
};

pub struct ProductsArgs<'a> {
    pub page: u32,
    pub limit: Option<u32>,
    pub search: &'a str,
    pub sort: Option<&'a str>,
    pub desc: bool,
}

const TITLE_WIDTH: usize = 32;
const BRAND_WIDTH: usize = 16;
const SKU_WIDTH: usize = 12;

pub async fn run(config: &Config, args: ProductsArgs<'_>) -> Result<()> {
    let sort = parse_sort(args.sort, args.desc)?;
    let limit = args.limit.unwrap_or_else(|| config.effective_page_size());
    let key = FetchKey::new(args.page, limit, args.search)?;

    let api = ApiClient::from_config(config).context("build HTTP client")?;
    let page = ProductSource::new(api).fetch_page(&key).await?;

    if page.products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<TITLE_WIDTH$}  {:<BRAND_WIDTH$}  {:<SKU_WIDTH$}  {:>6}  {:>10}",
        "ID",
        "Title",
        header(SortField::Brand, &sort),
        header(SortField::Sku, &sort),
        header(SortField::Rating, &sort),
        header(SortField::Price, &sort),
    );
    for product in sort.apply(&page.products) {
        println!("{}", row(product));
    }

    let window = PageWindow::new(key.page, key.limit, page.total);
    println!();
    println!(
        "{}  (page {} of {})",
        window.range_label(),
        window.current,
        window.total_pages
    );
    Ok(())
}

fn parse_sort(field: Option<&str>, desc: bool) -> Result<SortSpec> {
    let Some(name) = field else {
        return Ok(SortSpec::default());
    };
    let Some(field) = SortField::parse(name) else {
        anyhow::bail!("Unknown sort field '{name}' (expected brand, sku, rating or price)");
    };
    let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
    Ok(SortSpec::new(field, order))
}

fn header(field: SortField, sort: &SortSpec) -> String {
    match sort.indicator(field) {
        Some(arrow) => format!("{}{arrow}", field.label()),
        None => field.label().to_string(),
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn row(product: &Product) -> String {
    let rating = format!("{:.1}/5", product.rating);
    let price = format!("${:.2}", product.price);
    format!(
        "{:>5}  {:<TITLE_WIDTH$}  {:<BRAND_WIDTH$}  {:<SKU_WIDTH$}  {:>6}  {:>10}",
        product.id,
        clip(&product.title, TITLE_WIDTH),
        clip(&product.brand, BRAND_WIDTH),
        clip(&product.sku, SKU_WIDTH),
        rating,
        price,
    )
}
