use colored::*;
use serde_json::{json, Value};
use std::io::{self, Write};

const TARIFFS: [&str; 6] = [
    "OFFICE_OFFICE",
    "OFFICE_DOOR",
    "DOOR_OFFICE",
    "DOOR_DOOR",
    "OFFICE_POSTAMAT",
    "DOOR_POSTAMAT",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("{}", "🚚 Fargo Tariff Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let api = Api::new(base_url.trim_end_matches('/'));
    println!("{} {}", "🌐 API:".bright_cyan(), api.base_url);

    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 🏓 Ping");
        println!("2. 📦 Estado del catálogo");
        println!("3. 🔍 Buscar ciudad");
        println!("4. ✅ Comprobar elegibilidad");
        println!("5. 💰 Cotizar");
        println!("6. 🔎 Auditoría de cobertura");
        println!("7. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-7): ")?;

        let result = match choice.as_str() {
            "1" => api.get("/api/ping").await,
            "2" => api.get("/api/catalog/status").await,
            "3" => {
                let query = prompt("Texto a buscar: ")?;
                api.search_cities(&query).await
            }
            "4" => match read_selection()? {
                Some(selection) => api.post("/api/eligibility", &selection).await,
                None => continue,
            },
            "5" => match read_selection()? {
                Some(selection) => api.post("/api/calculator/quote", &selection).await,
                None => continue,
            },
            "6" => api.get("/api/coverage/audit").await.map(summarize_audit),
            "7" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        match result {
            Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
            Err(e) => println!("{} {}", "❌ Error:".bright_red().bold(), e),
        }
    }

    Ok(())
}

struct Api {
    base_url: String,
    client: reqwest::Client,
}

impl Api {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> anyhow::Result<Value> {
        let response = self.client.get(format!("{}{}", self.base_url, path)).send().await?;
        Self::read(response).await
    }

    async fn search_cities(&self, query: &str) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(format!("{}/api/cities/search", self.base_url))
            .query(&[("q", query), ("limit", "10")])
            .send()
            .await?;
        Self::read(response).await
    }

    async fn post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> anyhow::Result<Value> {
        let status = response.status();
        let color = if status.is_success() { "green" } else { "red" };
        println!("{} {}", "📥 Status:".bright_blue(), status.as_str().color(color).bold());
        let text = response.text().await?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn read_city(label: &str) -> anyhow::Result<Option<Value>> {
    let raw = prompt(&format!("{} (id;nombre upstream): ", label))?;
    let Some((id, name)) = raw.split_once(';') else {
        println!("{}", "❌ Formato esperado: 1;Toshkent shahri".bright_red());
        return Ok(None);
    };
    let Ok(id) = id.trim().parse::<i64>() else {
        println!("{}", "❌ Id no numérico".bright_red());
        return Ok(None);
    };
    Ok(Some(json!({ "kind": "named", "id": id, "name": name.trim() })))
}

fn read_selection() -> anyhow::Result<Option<Value>> {
    let Some(origin) = read_city("Origen")? else {
        return Ok(None);
    };
    let Some(destination) = read_city("Destino")? else {
        return Ok(None);
    };

    for (i, tariff) in TARIFFS.iter().enumerate() {
        println!("{}. {}", i + 1, tariff);
    }
    let tariff = prompt("Tarifa (1-6): ")?
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| TARIFFS.get(i).copied());
    let Some(tariff) = tariff else {
        println!("{}", "❌ Tarifa inválida".bright_red());
        return Ok(None);
    };

    let weight = prompt("Peso (kg): ")?;
    let language = prompt("Idioma (ru/uz/en, vacío = por defecto): ")?;

    let mut selection = json!({
        "origin": origin,
        "destination": destination,
        "tariff_type": tariff,
        "weight": weight,
    });
    if !language.is_empty() {
        selection["language"] = json!(language);
    }

    println!("{}", "📦 Payload:".bright_blue());
    println!("{}", serde_json::to_string_pretty(&selection)?);
    Ok(Some(selection))
}

/// Solo las ciudades con casi-matches, el informe completo es muy largo
fn summarize_audit(body: Value) -> Value {
    let report = &body["data"];
    let suspicious: Vec<&Value> = report["cities"]
        .as_array()
        .map(|cities| cities.iter().filter(|c| c.get("near_misses").is_some()).collect())
        .unwrap_or_default();

    json!({
        "cities_total": report["cities_total"],
        "cities_with_office": report["cities_with_office"],
        "cities_with_locker": report["cities_with_locker"],
        "near_misses": suspicious,
        "orphan_point_cities": report["orphan_point_cities"],
    })
}
