/*
 * SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use serde::{Deserialize, Serialize};

use super::{impl_resource, Entity};

/// https://redfish.dmtf.org/schemas/v1/ActionInfo.v1_4_2.json
/// Describes the parameters of one action on one resource.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionInfo {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(default)]
    pub parameters: Vec<ActionInfoParameter>,
}

impl_resource!(ActionInfo);

impl ActionInfo {
    pub fn parameter(&self, name: &str) -> Option<&ActionInfoParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// AllowableValues of the named parameter. Empty if the parameter is not
    /// described or lists no values.
    pub fn param_values(&self, name: &str) -> Vec<String> {
        self.parameter(name)
            .map(|p| p.allowable_values.clone())
            .unwrap_or_default()
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionInfoParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub data_type: Option<ParameterType>,
    pub object_data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_value_descriptions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowable_numbers: Vec<String>,
    pub allowable_pattern: Option<String>,
    pub default_value: Option<serde_json::Value>,
    pub minimum_value: Option<f64>,
    pub maximum_value: Option<f64>,
    pub array_size_minimum: Option<i64>,
    pub array_size_maximum: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ParameterType {
    Boolean,
    Number,
    NumberArray,
    String,
    StringArray,
    Object,
    ObjectArray,
    #[serde(other)]
    Unknown,
}
