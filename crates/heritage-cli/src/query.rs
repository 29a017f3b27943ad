//! Read-only command handlers for the CLI.
//!
//! These are called from `main` after config is loaded. Only `search` needs
//! the database; the rest talk to KHS or GeoServer directly.

use heritage_core::{ctcd_by_sido_name, AppConfig};
use heritage_geoserver::GeoServerClient;
use heritage_khs::{GeoPoint, KhsClient, ResolveRequest, Resolver};

/// Arguments of `resolve`, already split out of the clap enum.
#[derive(Debug)]
pub(crate) struct ResolveArgs {
    pub name: String,
    pub lon: f64,
    pub lat: f64,
    pub kind_code: Option<String>,
    pub region_code: Option<String>,
    pub sido: Option<String>,
    pub json: bool,
}

impl ResolveArgs {
    /// Builds the resolver input. An explicit region code wins over the
    /// province name; an unknown province leaves the region empty.
    fn to_request(&self) -> ResolveRequest {
        let region_code = self
            .region_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.sido
                    .as_deref()
                    .and_then(ctcd_by_sido_name)
                    .map(str::to_string)
            })
            .unwrap_or_default();

        ResolveRequest {
            kind_code: self.kind_code.clone().unwrap_or_default(),
            region_code,
            name: self.name.trim().to_string(),
            click: GeoPoint::new(self.lon, self.lat),
        }
    }
}

/// Resolve one clicked feature against the live KHS API and print the winner.
///
/// # Errors
///
/// Returns an error if the client cannot be built or nothing could be
/// resolved.
pub(crate) async fn run_resolve(config: &AppConfig, args: ResolveArgs) -> anyhow::Result<()> {
    let khs = KhsClient::with_base_url(
        &config.khs_base_url,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?;
    let resolver = Resolver::new(khs)
        .with_top_n(config.resolver_top_n)
        .with_page_size(config.list_page_size);

    let request = args.to_request();
    let best = resolver.resolve(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&best)?);
        return Ok(());
    }

    let detail = &best.detail;
    println!("{} ({})", detail.title, detail.kind);
    println!("asno:   {}", best.external_id);
    println!("score:  {}", best.score);
    if let Some(region) = &detail.region_name {
        println!("region: {region}");
    }
    if let Some(position) = detail.position() {
        println!("coords: {:.5}, {:.5}", position.lat, position.lon);
    }
    Ok(())
}

/// Search heritage tables by name and print one line per hit.
///
/// # Errors
///
/// Returns an error if the keyword is blank or table discovery fails.
pub(crate) async fn run_search(
    pool: &sqlx::PgPool,
    schema: &str,
    keyword: &str,
    row_limit: i64,
) -> anyhow::Result<()> {
    let response = heritage_db::search_heritage(pool, schema, keyword, row_limit).await?;

    if response.results.is_empty() {
        println!("no heritage matching '{}' in schema {schema}", keyword.trim());
        return Ok(());
    }

    println!("{:<32}{:<22}NAME", "TABLE", "LAT/LON");
    for hit in &response.results {
        let position = match (hit.lat, hit.lon) {
            (Some(lat), Some(lon)) => format!("{lat:.5},{lon:.5}"),
            _ => "-".to_string(),
        };
        let name = hit.properties.name.as_deref().unwrap_or("-");
        println!("{:<32}{:<22}{}", hit.source_table, position, name);
    }
    println!("{} result(s)", response.total);
    Ok(())
}

fn geoserver_client(config: &AppConfig) -> anyhow::Result<GeoServerClient> {
    Ok(GeoServerClient::with_base_url(
        &config.geoserver_base_url,
        &config.geoserver_workspace,
        config.upstream_timeout_secs,
        &config.user_agent,
    )?)
}

/// Print the region layer groups GeoServer currently advertises.
///
/// # Errors
///
/// Returns an error if GetCapabilities fails or cannot be parsed.
pub(crate) async fn run_layers(config: &AppConfig) -> anyhow::Result<()> {
    let groups = geoserver_client(config)?.layer_groups().await?;

    if groups.is_empty() {
        println!(
            "no heritage layers found in workspace {}",
            config.geoserver_workspace
        );
        return Ok(());
    }

    println!("{:<24}{:<12}COLOR", "GROUP", "REGION");
    for group in &groups {
        println!(
            "{:<24}{:<12}{}",
            group.name, group.display_name, group.color
        );
    }
    Ok(())
}

/// Print the distinct province names of the admin1 layer.
///
/// # Errors
///
/// Returns an error if the WFS request fails or the body is not GeoJSON.
pub(crate) async fn run_admin1(config: &AppConfig) -> anyhow::Result<()> {
    let names = geoserver_client(config)?.admin1_names().await?;
    for name in &names {
        println!("{name}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ResolveArgs {
        ResolveArgs {
            name: " 숭례문 ".to_string(),
            lon: 126.975,
            lat: 37.56,
            kind_code: None,
            region_code: None,
            sido: None,
            json: false,
        }
    }

    #[test]
    fn sido_name_fills_missing_region_code() {
        let request = ResolveArgs {
            sido: Some("서울특별시".to_string()),
            ..args()
        }
        .to_request();
        assert_eq!(request.region_code, "11");
        assert_eq!(request.name, "숭례문");
        assert_eq!(request.kind_code, "");
    }

    #[test]
    fn explicit_region_code_wins_over_sido() {
        let request = ResolveArgs {
            region_code: Some("21".to_string()),
            sido: Some("서울특별시".to_string()),
            ..args()
        }
        .to_request();
        assert_eq!(request.region_code, "21");
    }

    #[test]
    fn blank_name_is_passed_through_empty() {
        let request = ResolveArgs {
            name: "   ".to_string(),
            ..args()
        }
        .to_request();
        assert_eq!(request.name, "");
    }

    #[test]
    fn unknown_sido_leaves_region_empty() {
        let request = ResolveArgs {
            sido: Some("서울".to_string()),
            ..args()
        }
        .to_request();
        assert_eq!(request.region_code, "");
    }
}
