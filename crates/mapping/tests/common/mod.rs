//! Fixture models shared by the integration tests: a dashboard document with
//! nested classes, arrays, a string map and three tagged unions.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Once, OnceLock};

use mapping::{
    array, class, map, Boolean, Class, Enumeration, MappingError, Number, Schema, Tagged, Text,
    Timestamp, TypeField, Values, Variant,
};
use serde_json::Value as Json;
use time::OffsetDateTime;

/// Install a test subscriber once; `RUST_LOG=mapping=debug` shows engine events.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Implements [`Variant`] for a payload type and the union arm holding it.
macro_rules! variant {
    ($union:ident :: $arm:ident, $payload:ty, $tag:literal) => {
        impl Variant<$union> for $payload {
            const TAG: &'static str = $tag;

            fn wrap(self) -> $union {
                $union::$arm(self)
            }

            fn project(union: &$union) -> Option<&Self> {
                match union {
                    $union::$arm(payload) => Some(payload),
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

// ──────────────────────────────────────────────
// Units and durations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

pub const UNIT: Enumeration<Unit> = Enumeration::new(
    "Unit",
    &[
        ("minutes", Unit::Minutes),
        ("hours", Unit::Hours),
        ("days", Unit::Days),
        ("weeks", Unit::Weeks),
    ],
);

#[derive(Debug, Clone, PartialEq)]
pub struct Duration {
    pub value: f64,
    pub unit: Unit,
}

impl Class for Duration {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Duration>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Duration")
                .field("value", Number, |d| &d.value, |d| &mut d.value)
                .field("unit", UNIT, |d| &d.unit, |d| &mut d.unit)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Duration {
            value: values.take("value")?,
            unit: values.take("unit")?,
        })
    }
}

/// Same layout as [`Duration`], different type.
#[derive(Debug, Clone, PartialEq)]
pub struct Offset {
    pub value: f64,
    pub unit: Unit,
}

impl Class for Offset {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Offset>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Offset")
                .field("value", Number, |d| &d.value, |d| &mut d.value)
                .field("unit", UNIT, |d| &d.unit, |d| &mut d.unit)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Offset {
            value: values.take("value")?,
            unit: values.take("unit")?,
        })
    }
}

// ──────────────────────────────────────────────
// Ranges
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Range {
    Absolute(AbsoluteRange),
    NowRelative(NowRelativeRange),
    RoundedRelative(RoundedRelativeRange),
}

impl Tagged for Range {
    fn tag(&self) -> &'static str {
        match self {
            Range::Absolute(_) => AbsoluteRange::TAG,
            Range::NowRelative(_) => NowRelativeRange::TAG,
            Range::RoundedRelative(_) => RoundedRelativeRange::TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl Class for AbsoluteRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<AbsoluteRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("AbsoluteRange")
                .field("start", Timestamp, |r| &r.start, |r| &mut r.start)
                .field("end", Timestamp, |r| &r.end, |r| &mut r.end)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(AbsoluteRange {
            start: values.take("start")?,
            end: values.take("end")?,
        })
    }
}

variant!(Range::Absolute, AbsoluteRange, "absolute");

#[derive(Debug, Clone, PartialEq)]
pub struct NowRelativeRange {
    pub value: f64,
    pub unit: Unit,
}

impl Class for NowRelativeRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<NowRelativeRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("NowRelativeRange")
                .field("value", Number, |r| &r.value, |r| &mut r.value)
                .field("unit", UNIT, |r| &r.unit, |r| &mut r.unit)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(NowRelativeRange {
            value: values.take("value")?,
            unit: values.take("unit")?,
        })
    }
}

variant!(Range::NowRelative, NowRelativeRange, "now-relative");

#[derive(Debug, Clone, PartialEq)]
pub struct RoundedRelativeRange {
    pub unit: Unit,
    pub offset: Duration,
}

impl Class for RoundedRelativeRange {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<RoundedRelativeRange>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("RoundedRelativeRange")
                .field("unit", UNIT, |r| &r.unit, |r| &mut r.unit)
                .field("offset", class::<Duration>(), |r| &r.offset, |r| &mut r.offset)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(RoundedRelativeRange {
            unit: values.take("unit")?,
            offset: values.take("offset")?,
        })
    }
}

variant!(Range::RoundedRelative, RoundedRelativeRange, "rounded-relative");

pub fn range_type() -> &'static TypeField<Range> {
    static FIELD: OnceLock<TypeField<Range>> = OnceLock::new();
    FIELD.get_or_init(|| {
        TypeField::builder("Range")
            .variant::<AbsoluteRange>()
            .variant::<NowRelativeRange>()
            .variant::<RoundedRelativeRange>()
            .build()
    })
}

// ──────────────────────────────────────────────
// Data sources
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Embedded(EmbeddedDataSource),
    Reference(ReferenceDataSource),
}

impl Tagged for DataSource {
    fn tag(&self) -> &'static str {
        match self {
            DataSource::Embedded(_) => EmbeddedDataSource::TAG,
            DataSource::Reference(_) => ReferenceDataSource::TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedDataSource {
    pub query: String,
}

impl Class for EmbeddedDataSource {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<EmbeddedDataSource>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("EmbeddedDataSource")
                .field("query", Text, |d| &d.query, |d| &mut d.query)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(EmbeddedDataSource {
            query: values.take("query")?,
        })
    }
}

variant!(DataSource::Embedded, EmbeddedDataSource, "embedded");

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDataSource {
    pub id: String,
}

impl Class for ReferenceDataSource {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<ReferenceDataSource>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("ReferenceDataSource")
                .field("id", Text, |d| &d.id, |d| &mut d.id)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(ReferenceDataSource {
            id: values.take("id")?,
        })
    }
}

variant!(DataSource::Reference, ReferenceDataSource, "reference");

pub fn data_source_type() -> &'static TypeField<DataSource> {
    static FIELD: OnceLock<TypeField<DataSource>> = OnceLock::new();
    FIELD.get_or_init(|| {
        TypeField::builder("DataSource")
            .variant::<EmbeddedDataSource>()
            .variant::<ReferenceDataSource>()
            .build()
    })
}

// ──────────────────────────────────────────────
// Visualizations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Vis {
    LineChart(LineChart),
    BarChart(BarChart),
}

impl Tagged for Vis {
    fn tag(&self) -> &'static str {
        match self {
            Vis::LineChart(_) => LineChart::TAG,
            Vis::BarChart(_) => BarChart::TAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub stacked: bool,
    pub zero_based: bool,
    pub data_source: DataSource,
}

impl Class for LineChart {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<LineChart>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("LineChart")
                .field("stacked", Boolean, |c| &c.stacked, |c| &mut c.stacked)
                .field("zeroBased", Boolean, |c| &c.zero_based, |c| &mut c.zero_based)
                .field(
                    "dataSource",
                    data_source_type(),
                    |c| &c.data_source,
                    |c| &mut c.data_source,
                )
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(LineChart {
            stacked: values.take("stacked")?,
            zero_based: values.take("zeroBased")?,
            data_source: values.take("dataSource")?,
        })
    }
}

variant!(Vis::LineChart, LineChart, "line-chart");

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub stacked: bool,
    pub gap: f64,
    pub data_source: DataSource,
}

impl Class for BarChart {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<BarChart>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("BarChart")
                .field("stacked", Boolean, |c| &c.stacked, |c| &mut c.stacked)
                .field("gap", Number, |c| &c.gap, |c| &mut c.gap)
                .field(
                    "dataSource",
                    data_source_type(),
                    |c| &c.data_source,
                    |c| &mut c.data_source,
                )
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(BarChart {
            stacked: values.take("stacked")?,
            gap: values.take("gap")?,
            data_source: values.take("dataSource")?,
        })
    }
}

variant!(Vis::BarChart, BarChart, "bar-chart");

pub fn vis_type() -> &'static TypeField<Vis> {
    static FIELD: OnceLock<TypeField<Vis>> = OnceLock::new();
    FIELD.get_or_init(|| {
        TypeField::builder("Vis")
            .variant::<LineChart>()
            .variant::<BarChart>()
            .build()
    })
}

// ──────────────────────────────────────────────
// Dashboard
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub title: String,
    pub visualization: Vis,
}

impl Class for Component {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Component>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Component")
                .field("id", Text, |c| &c.id, |c| &mut c.id)
                .field("title", Text, |c| &c.title, |c| &mut c.title)
                .field(
                    "visualization",
                    vis_type(),
                    |c| &c.visualization,
                    |c| &mut c.visualization,
                )
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Component {
            id: values.take("id")?,
            title: values.take("title")?,
            visualization: values.take("visualization")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEntry {
    pub i: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Class for LayoutEntry {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<LayoutEntry>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("LayoutEntry")
                .field("i", Text, |l| &l.i, |l| &mut l.i)
                .field("x", Number, |l| &l.x, |l| &mut l.x)
                .field("y", Number, |l| &l.y, |l| &mut l.y)
                .field("w", Number, |l| &l.w, |l| &mut l.w)
                .field("h", Number, |l| &l.h, |l| &mut l.h)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(LayoutEntry {
            i: values.take("i")?,
            x: values.take("x")?,
            y: values.take("y")?,
            w: values.take("w")?,
            h: values.take("h")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub id: String,
    pub title: String,
    pub metadata: BTreeMap<String, String>,
    pub components: Vec<Component>,
    pub layout: Vec<LayoutEntry>,
    pub range: Range,
    pub description: Option<String>,
}

impl Class for Dashboard {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Dashboard>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Dashboard")
                .field("id", Text, |d| &d.id, |d| &mut d.id)
                .field("title", Text, |d| &d.title, |d| &mut d.title)
                .field("metadata", map(Text), |d| &d.metadata, |d| &mut d.metadata)
                .field(
                    "components",
                    array(class::<Component>()),
                    |d| &d.components,
                    |d| &mut d.components,
                )
                .field(
                    "layout",
                    array(class::<LayoutEntry>()),
                    |d| &d.layout,
                    |d| &mut d.layout,
                )
                .field("range", range_type(), |d| &d.range, |d| &mut d.range)
                .optional("description", Text, |d| &d.description, |d| &mut d.description)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Dashboard {
            id: values.take("id")?,
            title: values.take("title")?,
            metadata: values.take("metadata")?,
            components: values.take("components")?,
            layout: values.take("layout")?,
            range: values.take("range")?,
            description: values.take("description")?,
        })
    }
}

// ──────────────────────────────────────────────
// Aggregations
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub size: f64,
    pub unit: f64,
}

impl Class for Sampling {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Sampling>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Sampling")
                .field("size", Number, |s| &s.size, |s| &mut s.size)
                .field("unit", Number, |s| &s.unit, |s| &mut s.unit)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Sampling {
            size: values.take("size")?,
            unit: values.take("unit")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SumAggregation {
    pub sampling: Option<Sampling>,
}

impl Class for SumAggregation {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<SumAggregation>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("SumAggregation")
                .optional("sampling", class::<Sampling>(), |a| &a.sampling, |a| &mut a.sampling)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(SumAggregation {
            sampling: values.take("sampling")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub range: Range,
    pub query: String,
    pub options: Json,
}

impl Class for Query {
    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Query>> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::<Self>::builder("Query")
                .field("range", range_type(), |q| &q.range, |q| &mut q.range)
                .field("query", Text, |q| &q.query, |q| &mut q.query)
                .assign("options", |q| &q.options, |q| &mut q.options)
                .build()
        })
    }

    fn from_values(values: &mut Values) -> Result<Self, MappingError> {
        Ok(Query {
            range: values.take("range")?,
            query: values.take("query")?,
            options: values.take("options")?,
        })
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// Decode `input`, check it encodes back to the same JSON, and check that
/// applying `overrides` yields a value that no longer equals the decoded one.
pub fn assert_model<T: Class + std::fmt::Debug>(input: &Json, overrides: Values) -> T {
    let decoded: T = mapping::decode(input)
        .unwrap_or_else(|e| panic!("decode failed for {}: {}", T::schema().name(), e));

    let encoded = mapping::encode(&decoded).unwrap();
    assert_eq!(&encoded, input, "{} did not round-trip", T::schema().name());

    let copy = mapping::clone(&decoded, Values::new()).unwrap();
    assert!(mapping::equals(&copy, &decoded), "plain clone should be equal");

    let changed = mapping::clone(&decoded, overrides).unwrap();
    assert!(
        !mapping::equals(&changed, &decoded),
        "overrides should change {:?}",
        changed
    );

    decoded
}

pub fn dashboard_json() -> Json {
    serde_json::json!({
        "id": "d1",
        "title": "Hosts",
        "metadata": {"owner": "ops"},
        "components": [
            {
                "id": "c1",
                "title": "CPU",
                "visualization": {
                    "type": "line-chart",
                    "stacked": false,
                    "zeroBased": true,
                    "dataSource": {"type": "embedded", "query": "average by host"}
                }
            },
            {
                "id": "c2",
                "title": "Memory",
                "visualization": {
                    "type": "bar-chart",
                    "stacked": true,
                    "gap": 5,
                    "dataSource": {"type": "reference", "id": "ds-7"}
                }
            }
        ],
        "layout": [
            {"i": "c1", "x": 0, "y": 0, "w": 4, "h": 2},
            {"i": "c2", "x": 4, "y": 0, "w": 4, "h": 2}
        ],
        "range": {
            "type": "rounded-relative",
            "unit": "days",
            "offset": {"value": 1, "unit": "weeks"}
        }
    })
}
