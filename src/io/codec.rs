//! Model graph ⇄ primitive JSON document.
//!
//! The document is deliberately primitive-typed (strings, numbers, booleans,
//! arrays, maps) so any JSON tool can read it:
//!
//! - `wells` lists well names in insertion order; `wells_dict` maps each
//!   name to its record (the array carries the order, the map the data)
//! - timestamps are integer epoch seconds; the offset tolerance is a
//!   whole-second duration string such as `"302400s"`
//! - each fit record names its method in `fit_method` and nests the method
//!   parameters under a key equal to that tag, so new methods extend the
//!   format without reshaping existing records
//!
//! Decoding resolves fit records against the wells decoded just before, by
//! name; order of both wells and fits survives the round trip.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value, json};

use crate::domain::{TimeSeries, Well, WellRole};
use crate::error::{GwrefError, Result};
use crate::fit::result::{FitMethod, FitResult, LinRegParams};
use crate::model::Model;

/// Encode the whole model graph as a JSON document.
pub fn encode(model: &Model) -> Value {
    let well_names: Vec<Value> = model
        .wells()
        .iter()
        .map(|w| Value::String(w.name().to_string()))
        .collect();

    let mut wells_dict = Map::new();
    for well in model.wells() {
        wells_dict.insert(well.name().to_string(), encode_well(well));
    }

    let fits: Vec<Value> = model.fits().iter().map(encode_fit).collect();

    json!({
        "name": model.name(),
        "wells": well_names,
        "wells_dict": wells_dict,
        "fits": fits,
    })
}

/// Decode a document produced by [`encode`].
///
/// Wells are rebuilt first: fit records refer to wells by name and resolve
/// against the model under construction.
pub fn decode(doc: &Value) -> Result<Model> {
    let name = str_field(doc, "name")?;
    let mut model = Model::new(name);

    let well_names = field(doc, "wells")?.as_array().ok_or_else(|| {
        GwrefError::Validation("'wells' must be an array of well names".to_string())
    })?;
    let wells_dict = field(doc, "wells_dict")?.as_object().ok_or_else(|| {
        GwrefError::Validation("'wells_dict' must be a map of well records".to_string())
    })?;

    for name_value in well_names {
        let well_name = name_value.as_str().ok_or_else(|| {
            GwrefError::Validation("'wells' entries must be strings".to_string())
        })?;
        let record = wells_dict.get(well_name).ok_or_else(|| {
            GwrefError::NotFound(format!("well '{well_name}' is missing from 'wells_dict'"))
        })?;
        model.add_well(decode_well(record)?)?;
    }

    if let Some(fits) = doc.get("fits") {
        let fits = fits.as_array().ok_or_else(|| {
            GwrefError::Validation("'fits' must be an array of fit records".to_string())
        })?;
        for record in fits {
            let fit = decode_fit(record, &model)?;
            model.push_fit(fit);
        }
    }

    Ok(model)
}

// ------------------------------------------------------------------ wells

fn encode_well(well: &Well) -> Value {
    let timeseries = match well.timeseries() {
        Some(series) => Value::Array(
            series
                .points()
                .iter()
                .map(|(t, v)| json!([t.timestamp(), v]))
                .collect(),
        ),
        None => Value::Null,
    };

    json!({
        "name": well.name(),
        "is_reference": well.is_reference(),
        "timeseries": timeseries,
        "latitude": well.latitude,
        "longitude": well.longitude,
        "elevation": well.elevation,
    })
}

fn decode_well(record: &Value) -> Result<Well> {
    let name = str_field(record, "name")?;
    let role = if bool_field(record, "is_reference")? {
        WellRole::Reference
    } else {
        WellRole::Observation
    };
    let mut well = Well::new(name, role)?;

    match field(record, "timeseries")? {
        Value::Null => {}
        Value::Array(rows) => {
            let points = rows
                .iter()
                .map(|row| decode_point(name, row))
                .collect::<Result<Vec<_>>>()?;
            well.set_timeseries(TimeSeries::new(points)?);
        }
        _ => {
            return Err(GwrefError::Validation(format!(
                "well '{name}': 'timeseries' must be an array or null"
            )));
        }
    }

    well.latitude = opt_f64_field(record, "latitude")?;
    well.longitude = opt_f64_field(record, "longitude")?;
    well.elevation = opt_f64_field(record, "elevation")?;
    Ok(well)
}

fn decode_point(well_name: &str, row: &Value) -> Result<(DateTime<Utc>, f64)> {
    let pair = row.as_array().filter(|p| p.len() == 2).ok_or_else(|| {
        GwrefError::Validation(format!(
            "well '{well_name}': time series rows must be [timestamp, value] pairs"
        ))
    })?;
    let secs = pair[0].as_i64().ok_or_else(|| {
        GwrefError::Validation(format!(
            "well '{well_name}': timestamps must be integer epoch seconds"
        ))
    })?;
    let value = pair[1].as_f64().ok_or_else(|| {
        GwrefError::Validation(format!("well '{well_name}': values must be numbers"))
    })?;
    Ok((epoch_seconds(secs)?, value))
}

// ------------------------------------------------------------------- fits

/// Encode one fit as its document record.
///
/// Well identities are written as names only; the well data lives in
/// `wells_dict`.
pub fn encode_fit(fit: &FitResult) -> Value {
    let mut record = json!({
        "ref_well": fit.ref_well(),
        "obs_well": fit.obs_well(),
        "n": fit.n(),
        "rmse": fit.rmse(),
        "t_a": fit.t_a(),
        "stderr": fit.stderr(),
        "pred_const": fit.pred_const(),
        "p": fit.p(),
        "offset": format!("{}s", fit.offset().num_seconds()),
        "tmin": fit.tmin().map(|t| t.timestamp()),
        "tmax": fit.tmax().map(|t| t.timestamp()),
        "fit_method": fit.method().tag(),
    });

    match fit.method() {
        FitMethod::LinearRegression(params) => {
            record[FitMethod::LINREG_TAG] = json!({
                "slope": params.slope,
                "intercept": params.intercept,
                "rvalue": params.rvalue,
                "pvalue": params.pvalue,
                "stderr": params.stderr,
            });
        }
    }

    record
}

/// Decode one fit record against already-reconstructed wells.
///
/// The record stores wells by name, so the caller must supply the model the
/// names resolve against; an unknown name or method tag is `NotFound`.
pub fn decode_fit(record: &Value, model: &Model) -> Result<FitResult> {
    let ref_well = str_field(record, "ref_well")?;
    let obs_well = str_field(record, "obs_well")?;
    for name in [ref_well, obs_well] {
        if model.well(name).is_none() {
            return Err(GwrefError::NotFound(format!(
                "fit record refers to unknown well '{name}'"
            )));
        }
    }

    let tag = str_field(record, "fit_method")?;
    let method = if tag == FitMethod::LINREG_TAG {
        let payload = field(record, tag)?;
        let params: LinRegParams = serde_json::from_value(payload.clone())
            .map_err(|e| GwrefError::Validation(format!("malformed '{tag}' parameters: {e}")))?;
        FitMethod::LinearRegression(params)
    } else {
        return Err(GwrefError::NotFound(format!(
            "unknown fit method tag '{tag}'"
        )));
    };

    Ok(FitResult {
        ref_well: ref_well.to_string(),
        obs_well: obs_well.to_string(),
        method,
        n: usize_field(record, "n")?,
        rmse: f64_field(record, "rmse")?,
        t_a: f64_field(record, "t_a")?,
        stderr: f64_field(record, "stderr")?,
        pred_const: f64_field(record, "pred_const")?,
        p: f64_field(record, "p")?,
        offset: parse_offset(str_field(record, "offset")?)?,
        tmin: opt_timestamp_field(record, "tmin")?,
        tmax: opt_timestamp_field(record, "tmax")?,
    })
}

// ---------------------------------------------------------------- helpers

fn field<'a>(record: &'a Value, key: &str) -> Result<&'a Value> {
    record
        .get(key)
        .ok_or_else(|| GwrefError::Validation(format!("missing field '{key}'")))
}

fn str_field<'a>(record: &'a Value, key: &str) -> Result<&'a str> {
    field(record, key)?
        .as_str()
        .ok_or_else(|| GwrefError::Validation(format!("field '{key}' must be a string")))
}

fn bool_field(record: &Value, key: &str) -> Result<bool> {
    field(record, key)?
        .as_bool()
        .ok_or_else(|| GwrefError::Validation(format!("field '{key}' must be a boolean")))
}

fn f64_field(record: &Value, key: &str) -> Result<f64> {
    field(record, key)?
        .as_f64()
        .ok_or_else(|| GwrefError::Validation(format!("field '{key}' must be a number")))
}

fn usize_field(record: &Value, key: &str) -> Result<usize> {
    let n = field(record, key)?
        .as_u64()
        .ok_or_else(|| GwrefError::Validation(format!("field '{key}' must be a non-negative integer")))?;
    Ok(n as usize)
}

fn opt_f64_field(record: &Value, key: &str) -> Result<Option<f64>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let n = value.as_f64().ok_or_else(|| {
                GwrefError::Validation(format!("field '{key}' must be a number or null"))
            })?;
            Ok(Some(n))
        }
    }
}

fn opt_timestamp_field(record: &Value, key: &str) -> Result<Option<DateTime<Utc>>> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let secs = value.as_i64().ok_or_else(|| {
                GwrefError::Validation(format!("field '{key}' must be epoch seconds or null"))
            })?;
            Ok(Some(epoch_seconds(secs)?))
        }
    }
}

fn epoch_seconds(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| GwrefError::Validation(format!("timestamp {secs} is out of range")))
}

fn parse_offset(text: &str) -> Result<Duration> {
    let secs = text
        .strip_suffix('s')
        .and_then(|digits| digits.parse::<i64>().ok())
        .ok_or_else(|| {
            GwrefError::Validation(format!(
                "offset '{text}' must be a whole-second duration such as '302400s'"
            ))
        })?;
    Ok(Duration::seconds(secs))
}
