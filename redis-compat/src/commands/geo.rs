//! Geo commands
//!
//! `GEORADIUS*` and `GEOSEARCH*` share one option record each; the read-only
//! and storing variants are separate builders since Redis treats them as
//! different commands.

use crate::cmd::Cmd;
use crate::registry;
use redis_compat_core::Arg;

/// Distance unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeoUnit {
    /// Meters
    M,
    /// Kilometers
    #[default]
    Km,
    /// Feet
    Ft,
    /// Miles
    Mi,
}

impl GeoUnit {
    /// Parse a unit name; the empty string means kilometers.
    ///
    /// # Panics
    ///
    /// On anything other than `m`, `km`, `ft`, `mi` (case-insensitive).
    pub fn parse(unit: &str) -> Self {
        match unit.to_ascii_lowercase().as_str() {
            "" | "km" => Self::Km,
            "m" => Self::M,
            "ft" => Self::Ft,
            "mi" => Self::Mi,
            other => panic!("invalid geo unit: {other:?}"),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::M => "m",
            Self::Km => "km",
            Self::Ft => "ft",
            Self::Mi => "mi",
        }
    }
}

/// Sort order of geo results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoSort {
    /// Nearest first
    Asc,
    /// Farthest first
    Desc,
}

/// Options of `GEORADIUS` / `GEORADIUSBYMEMBER`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoRadiusQuery {
    /// Radius
    pub radius: f64,
    /// Radius unit
    pub unit: GeoUnit,
    /// `WITHCOORD`
    pub with_coord: bool,
    /// `WITHDIST`
    pub with_dist: bool,
    /// `WITHHASH`
    pub with_hash: bool,
    /// `COUNT n`
    pub count: Option<i64>,
    /// `ANY`, requires `count`
    pub any: bool,
    /// `ASC` / `DESC`
    pub sort: Option<GeoSort>,
    /// `STORE key`
    pub store: Option<String>,
    /// `STOREDIST key`
    pub store_dist: Option<String>,
}

impl GeoRadiusQuery {
    /// A radius query in the given unit
    pub fn new(radius: f64, unit: GeoUnit) -> Self {
        Self {
            radius,
            unit,
            ..Self::default()
        }
    }

    /// Return coordinates
    #[must_use]
    pub fn with_coord(mut self) -> Self {
        self.with_coord = true;
        self
    }

    /// Return distances
    #[must_use]
    pub fn with_dist(mut self) -> Self {
        self.with_dist = true;
        self
    }

    /// Return raw geohashes
    #[must_use]
    pub fn with_hash(mut self) -> Self {
        self.with_hash = true;
        self
    }

    /// Limit results
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Return as soon as `count` matches are found
    #[must_use]
    pub fn any(mut self) -> Self {
        self.any = true;
        self
    }

    /// Sort by distance
    #[must_use]
    pub fn sort(mut self, sort: GeoSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Store member names into `key`
    #[must_use]
    pub fn store(mut self, key: impl Into<String>) -> Self {
        self.store = Some(key.into());
        self
    }

    /// Store distances into `key`
    #[must_use]
    pub fn store_dist(mut self, key: impl Into<String>) -> Self {
        self.store_dist = Some(key.into());
        self
    }

    fn is_store(&self) -> bool {
        self.store.is_some() || self.store_dist.is_some()
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        assert!(
            !(self.store.is_some() && self.store_dist.is_some()),
            "GEORADIUS: STORE and STOREDIST are mutually exclusive"
        );
        assert!(
            !(self.is_store() && (self.with_coord || self.with_dist || self.with_hash)),
            "GEORADIUS: STORE and STOREDIST cannot be combined with WITHCOORD, WITHDIST or WITHHASH"
        );
        let cmd = cmd
            .arg(self.radius)
            .arg(self.unit.as_str())
            .arg_if(self.with_coord, "WITHCOORD")
            .arg_if(self.with_dist, "WITHDIST")
            .arg_if(self.with_hash, "WITHHASH");
        let cmd = count_any(cmd, self.count, self.any);
        let cmd = sort(cmd, self.sort);
        match (&self.store, &self.store_dist) {
            (Some(key), _) => cmd.arg("STORE").key(key.as_str()),
            (_, Some(key)) => cmd.arg("STOREDIST").key(key.as_str()),
            _ => cmd,
        }
    }
}

/// Center of a `GEOSEARCH`
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFrom {
    /// `FROMMEMBER member`
    Member(String),
    /// `FROMLONLAT longitude latitude`
    LonLat(f64, f64),
}

/// Shape of a `GEOSEARCH`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoShape {
    /// `BYRADIUS radius unit`
    Radius(f64, GeoUnit),
    /// `BYBOX width height unit`
    Box(f64, f64, GeoUnit),
}

/// Options of `GEOSEARCH` / `GEOSEARCHSTORE`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSearchQuery {
    /// Center
    pub from: GeoFrom,
    /// Area
    pub by: GeoShape,
    /// `COUNT n`
    pub count: Option<i64>,
    /// `ANY`
    pub any: bool,
    /// `ASC` / `DESC`
    pub sort: Option<GeoSort>,
    /// `WITHCOORD` (search only)
    pub with_coord: bool,
    /// `WITHDIST` (search only)
    pub with_dist: bool,
    /// `WITHHASH` (search only)
    pub with_hash: bool,
    /// `STOREDIST` (store only)
    pub store_dist: bool,
}

impl GeoSearchQuery {
    /// Search around `from` within `by`
    pub fn new(from: GeoFrom, by: GeoShape) -> Self {
        Self {
            from,
            by,
            count: None,
            any: false,
            sort: None,
            with_coord: false,
            with_dist: false,
            with_hash: false,
            store_dist: false,
        }
    }

    /// Limit results
    #[must_use]
    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    /// Return as soon as `count` matches are found
    #[must_use]
    pub fn any(mut self) -> Self {
        self.any = true;
        self
    }

    /// Sort by distance
    #[must_use]
    pub fn sort(mut self, sort: GeoSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Return coordinates
    #[must_use]
    pub fn with_coord(mut self) -> Self {
        self.with_coord = true;
        self
    }

    /// Return distances
    #[must_use]
    pub fn with_dist(mut self) -> Self {
        self.with_dist = true;
        self
    }

    /// Return raw geohashes
    #[must_use]
    pub fn with_hash(mut self) -> Self {
        self.with_hash = true;
        self
    }

    /// Store distances instead of positions
    #[must_use]
    pub fn store_dist(mut self) -> Self {
        self.store_dist = true;
        self
    }

    fn apply(&self, cmd: Cmd) -> Cmd {
        let cmd = match &self.from {
            GeoFrom::Member(m) => cmd.arg("FROMMEMBER").arg(m.as_str()),
            GeoFrom::LonLat(lon, lat) => cmd.arg("FROMLONLAT").arg(*lon).arg(*lat),
        };
        let cmd = match self.by {
            GeoShape::Radius(r, unit) => cmd.arg("BYRADIUS").arg(r).arg(unit.as_str()),
            GeoShape::Box(w, h, unit) => cmd.arg("BYBOX").arg(w).arg(h).arg(unit.as_str()),
        };
        let cmd = sort(cmd, self.sort);
        count_any(cmd, self.count, self.any)
    }
}

fn count_any(cmd: Cmd, count: Option<i64>, any: bool) -> Cmd {
    match count {
        Some(n) => cmd.arg("COUNT").arg(n).arg_if(any, "ANY"),
        None => {
            assert!(!any, "geo query: ANY requires COUNT");
            cmd
        }
    }
}

fn sort(cmd: Cmd, sort: Option<GeoSort>) -> Cmd {
    match sort {
        Some(GeoSort::Asc) => cmd.arg("ASC"),
        Some(GeoSort::Desc) => cmd.arg("DESC"),
        None => cmd,
    }
}

/// A member to add with `GEOADD`
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMember {
    /// Longitude
    pub longitude: f64,
    /// Latitude
    pub latitude: f64,
    /// Member name
    pub name: String,
}

impl GeoMember {
    /// Build a member
    pub fn new(name: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            name: name.into(),
        }
    }
}

/// Add positioned members
pub fn geoadd(key: &str, members: &[GeoMember]) -> Cmd {
    members.iter().fold(Cmd::new(&registry::GEOADD).key(key), |cmd, m| {
        cmd.arg(m.longitude).arg(m.latitude).arg(m.name.as_str())
    })
}

/// `GEODIST key a b [unit]`, unit `""` meaning kilometers
pub fn geodist(key: &str, member1: &str, member2: &str, unit: &str) -> Cmd {
    Cmd::new(&registry::GEODIST)
        .key(key)
        .arg(member1)
        .arg(member2)
        .arg(GeoUnit::parse(unit).as_str())
}

/// Geohash strings of members
pub fn geohash<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::GEOHASH)
        .key(key)
        .args(members.iter().cloned())
}

/// Positions of members
pub fn geopos<V: Into<Arg> + Clone>(key: &str, members: &[V]) -> Cmd {
    Cmd::new(&registry::GEOPOS)
        .key(key)
        .args(members.iter().cloned())
}

/// `GEORADIUS key lon lat radius unit ...` without `STORE`
///
/// # Panics
///
/// When the query carries `STORE` or `STOREDIST`; use [`georadius_store`].
pub fn georadius(key: &str, longitude: f64, latitude: f64, query: &GeoRadiusQuery) -> Cmd {
    assert!(!query.is_store(), "GEORADIUS: use georadius_store for STORE");
    let cmd = Cmd::new(&registry::GEORADIUS)
        .key(key)
        .arg(longitude)
        .arg(latitude);
    query.apply(cmd)
}

/// # Panics
///
/// When the query carries `STORE` or `STOREDIST`.
pub fn georadius_ro(key: &str, longitude: f64, latitude: f64, query: &GeoRadiusQuery) -> Cmd {
    assert!(!query.is_store(), "GEORADIUS_RO: STORE is not allowed");
    let cmd = Cmd::new(&registry::GEORADIUS_RO)
        .key(key)
        .arg(longitude)
        .arg(latitude);
    query.apply(cmd)
}

/// # Panics
///
/// When neither `STORE` nor `STOREDIST` is set, or both are.
pub fn georadius_store(key: &str, longitude: f64, latitude: f64, query: &GeoRadiusQuery) -> Cmd {
    assert!(query.is_store(), "GEORADIUS: STORE or STOREDIST is required");
    let cmd = Cmd::new(&registry::GEORADIUS_STORE)
        .key(key)
        .arg(longitude)
        .arg(latitude);
    query.apply(cmd)
}

/// Members within a radius of another member
pub fn georadius_by_member(key: &str, member: &str, query: &GeoRadiusQuery) -> Cmd {
    assert!(
        !query.is_store(),
        "GEORADIUSBYMEMBER: use georadius_by_member_store for STORE"
    );
    let cmd = Cmd::new(&registry::GEORADIUSBYMEMBER).key(key).arg(member);
    query.apply(cmd)
}

/// Read-only `GEORADIUSBYMEMBER`
pub fn georadius_by_member_ro(key: &str, member: &str, query: &GeoRadiusQuery) -> Cmd {
    assert!(
        !query.is_store(),
        "GEORADIUSBYMEMBER_RO: STORE is not allowed"
    );
    let cmd = Cmd::new(&registry::GEORADIUSBYMEMBER_RO).key(key).arg(member);
    query.apply(cmd)
}

/// `GEORADIUSBYMEMBER` with `STORE` or `STOREDIST`
pub fn georadius_by_member_store(key: &str, member: &str, query: &GeoRadiusQuery) -> Cmd {
    assert!(
        query.is_store(),
        "GEORADIUSBYMEMBER: STORE or STOREDIST is required"
    );
    let cmd = Cmd::new(&registry::GEORADIUSBYMEMBER_STORE)
        .key(key)
        .arg(member);
    query.apply(cmd)
}

/// # Panics
///
/// When `store_dist` is set; it only applies to [`geosearch_store`].
pub fn geosearch(key: &str, query: &GeoSearchQuery) -> Cmd {
    assert!(!query.store_dist, "GEOSEARCH: STOREDIST requires GEOSEARCHSTORE");
    query
        .apply(Cmd::new(&registry::GEOSEARCH).key(key))
        .arg_if(query.with_coord, "WITHCOORD")
        .arg_if(query.with_dist, "WITHDIST")
        .arg_if(query.with_hash, "WITHHASH")
}

/// # Panics
///
/// When a `WITH*` option is set; `GEOSEARCHSTORE` does not return members.
pub fn geosearch_store(destination: &str, source: &str, query: &GeoSearchQuery) -> Cmd {
    assert!(
        !(query.with_coord || query.with_dist || query.with_hash),
        "GEOSEARCHSTORE: WITHCOORD, WITHDIST and WITHHASH are not allowed"
    );
    query
        .apply(
            Cmd::new(&registry::GEOSEARCHSTORE)
                .key(destination)
                .key(source),
        )
        .arg_if(query.store_dist, "STOREDIST")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parsing() {
        assert_eq!(GeoUnit::parse(""), GeoUnit::Km);
        assert_eq!(GeoUnit::parse("M"), GeoUnit::M);
        assert_eq!(
            geodist("g", "a", "b", "").to_string(),
            "GEODIST g a b km"
        );
    }

    #[test]
    #[should_panic(expected = "invalid geo unit")]
    fn test_invalid_unit_panics() {
        let _ = GeoUnit::parse("yards");
    }

    #[test]
    fn test_georadius_ro() {
        let q = GeoRadiusQuery::new(200.0, GeoUnit::Km)
            .with_dist()
            .with_coord()
            .count(5)
            .any()
            .sort(GeoSort::Asc);
        assert_eq!(
            georadius_ro("Sicily", 15.0, 37.0, &q).to_string(),
            "GEORADIUS_RO Sicily 15 37 200 km WITHCOORD WITHDIST COUNT 5 ANY ASC"
        );
    }

    #[test]
    fn test_georadius_store_key() {
        let q = GeoRadiusQuery::new(10.0, GeoUnit::M).store_dist("dst");
        let cmd = georadius_by_member_store("g", "m", &q);
        assert_eq!(cmd.to_string(), "GEORADIUSBYMEMBER g m 10 m STOREDIST dst");
        assert_eq!(cmd.key_strings(), vec!["g", "dst"]);
    }

    #[test]
    #[should_panic(expected = "mutually exclusive")]
    fn test_store_and_store_dist_panics() {
        let q = GeoRadiusQuery::new(1.0, GeoUnit::Km).store("a").store_dist("b");
        let _ = georadius_store("g", 0.0, 0.0, &q);
    }

    #[test]
    #[should_panic(expected = "cannot be combined with WITHCOORD")]
    fn test_store_with_reply_options_panics() {
        let q = GeoRadiusQuery::new(1.0, GeoUnit::Km).with_dist().store_dist("b");
        let _ = georadius_store("g", 0.0, 0.0, &q);
    }

    #[test]
    #[should_panic(expected = "STORE is not allowed")]
    fn test_store_on_read_only_panics() {
        let q = GeoRadiusQuery::new(1.0, GeoUnit::Km).store("a");
        let _ = georadius_by_member_ro("g", "m", &q);
    }

    #[test]
    fn test_geosearch() {
        let q = GeoSearchQuery::new(
            GeoFrom::LonLat(15.0, 37.0),
            GeoShape::Box(400.0, 400.0, GeoUnit::Km),
        )
        .sort(GeoSort::Asc)
        .count(2)
        .with_dist();
        assert_eq!(
            geosearch("g", &q).to_string(),
            "GEOSEARCH g FROMLONLAT 15 37 BYBOX 400 400 km ASC COUNT 2 WITHDIST"
        );

        let q = GeoSearchQuery::new(
            GeoFrom::Member("Palermo".into()),
            GeoShape::Radius(100.0, GeoUnit::Mi),
        )
        .store_dist();
        assert_eq!(
            geosearch_store("dst", "g", &q).to_string(),
            "GEOSEARCHSTORE dst g FROMMEMBER Palermo BYRADIUS 100 mi STOREDIST"
        );
    }
}
