//! Prompt templates.
//!
//! Each extraction template spells out the JSON shape of the matching record
//! in `documents::fields`; keep the two in step when adding fields.

use super::DocumentType;

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

pub fn classification_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following OCR text and determine what kind of document it is.
The documents are usually Indonesian business papers.

OCR TEXT:
{ocr_text}

AVAILABLE DOCUMENT TYPES:
1. receipt - a shop or stall purchase receipt (struk belanja)
2. invoice - a business invoice (faktur) with invoice number, payment terms, etc.
3. purchase_order - a purchase order (PO)
4. bank_statement - a bank account statement (rekening koran)
5. stock_card - an inventory stock card (kartu stok)
6. contract - a contract or agreement letter (surat perjanjian)

INSTRUCTIONS:
Answer with ONLY one word from the list above, in lowercase.
If unsure, pick the closest match.

ANSWER:"#
    )
}

pub fn extraction_prompt(doc_type: DocumentType, ocr_text: &str) -> String {
    match doc_type {
        DocumentType::Receipt => receipt_prompt(ocr_text),
        DocumentType::Invoice => invoice_prompt(ocr_text),
        DocumentType::PurchaseOrder => purchase_order_prompt(ocr_text),
        DocumentType::BankStatement => bank_statement_prompt(ocr_text),
        DocumentType::StockCard => stock_card_prompt(ocr_text),
        DocumentType::Contract => contract_prompt(ocr_text),
    }
}

fn receipt_prompt(ocr_text: &str) -> String {
    format!(
        r#"You are an expert at parsing Indonesian shopping receipts.
Analyze the following OCR text and extract the information as precise JSON.

OCR TEXT:
{ocr_text}

INSTRUCTIONS:
1. Detect the store name (usually on the first lines / header)
2. Detect the transaction date (Indonesian format: DD/MM/YYYY or DD-MM-YYYY)
3. Extract ALL purchased items with their correct prices
4. Compute an accurate total (if the receipt has none, sum the items)
5. Ignore text that is not an item (such as "Terima Kasih", "Total", etc.)

OUTPUT FORMAT (JSON):
{{
  "storeName": "store name",
  "date": "transaction date",
  "items": [
    {{"name": "item name", "quantity": 1, "price": price_number}}
  ],
  "total": final_total
}}

IMPORTANT RULES:
- Prices must be NUMBERS without "Rp" or thousands separators
- If an item has quantity > 1, price is unit price x quantity
- The total must be the sum of all items
- If unsure about an item, skip it rather than guess

Return ONLY the JSON, without markdown or any other text."#
    )
}

fn invoice_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following invoice and extract the important information.

OCR TEXT:
{ocr_text}

Extract the following as JSON:
{{
  "invoiceNumber": "invoice number",
  "invoiceDate": "invoice date",
  "dueDate": "due date",
  "sellerName": "seller / company name",
  "sellerAddress": "seller address",
  "buyerName": "buyer name",
  "buyerAddress": "buyer address",
  "items": [
    {{
      "description": "item description",
      "quantity": quantity,
      "unitPrice": unit_price,
      "amount": line_total
    }}
  ],
  "subtotal": subtotal,
  "tax": tax,
  "total": final_total,
  "paymentTerms": "payment terms",
  "notes": "additional notes"
}}

RULES:
- All amounts are numbers (not strings)
- If a field is not found, use null
- Output ONLY JSON without markdown

ANSWER:"#
    )
}

fn purchase_order_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following purchase order (PO) and extract the important information.

OCR TEXT:
{ocr_text}

Extract the following as JSON:
{{
  "poNumber": "PO number",
  "poDate": "PO date",
  "deliveryDate": "requested delivery date",
  "buyerName": "ordering company",
  "buyerAddress": "ordering company address",
  "supplierName": "supplier / vendor name",
  "supplierAddress": "supplier address",
  "items": [
    {{
      "description": "item description",
      "quantity": quantity,
      "unit": "unit (pcs, box, kg, ...)",
      "unitPrice": unit_price,
      "amount": line_total
    }}
  ],
  "subtotal": subtotal,
  "tax": tax,
  "total": final_total,
  "paymentTerms": "payment terms",
  "notes": "additional notes"
}}

RULES:
- All amounts are numbers (not strings)
- If a field is not found, use null
- Output ONLY JSON without markdown

ANSWER:"#
    )
}

fn bank_statement_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following bank statement and extract the information.

OCR TEXT:
{ocr_text}

Extract as JSON:
{{
  "accountNumber": "account number",
  "accountHolder": "account holder name",
  "bankName": "bank name",
  "statementPeriod": "period (e.g. 01/01/2025 - 31/01/2025)",
  "openingBalance": opening_balance,
  "closingBalance": closing_balance,
  "transactions": [
    {{
      "date": "date",
      "description": "transaction description",
      "debit": debit_amount,
      "credit": credit_amount,
      "balance": balance_after_transaction
    }}
  ],
  "totalDebit": total_debit,
  "totalCredit": total_credit
}}

Output ONLY JSON without markdown.

ANSWER:"#
    )
}

fn stock_card_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following inventory stock card and extract the information.

OCR TEXT:
{ocr_text}

Extract as JSON:
{{
  "itemName": "item name",
  "itemCode": "item code / SKU",
  "unit": "unit of measure",
  "warehouse": "warehouse or location",
  "period": "period covered",
  "openingStock": opening_quantity,
  "closingStock": closing_quantity,
  "movements": [
    {{
      "date": "date",
      "reference": "document reference",
      "description": "description",
      "quantityIn": quantity_in,
      "quantityOut": quantity_out,
      "balance": balance_after_movement
    }}
  ],
  "totalIn": total_in,
  "totalOut": total_out
}}

RULES:
- All quantities are numbers (not strings)
- If a field is not found, use null
- Output ONLY JSON without markdown

ANSWER:"#
    )
}

fn contract_prompt(ocr_text: &str) -> String {
    format!(
        r#"Analyze the following contract or agreement and extract the key information.

OCR TEXT:
{ocr_text}

Extract as JSON:
{{
  "contractNumber": "contract number",
  "title": "contract title",
  "contractDate": "signing date",
  "effectiveDate": "effective date",
  "expiryDate": "expiry / end date",
  "parties": [
    {{"name": "party name", "role": "role (e.g. first party, second party)", "address": "address"}}
  ],
  "contractValue": contract_value,
  "currency": "currency",
  "paymentTerms": "payment terms",
  "keyTerms": ["important clause", "..."],
  "governingLaw": "governing law / jurisdiction"
}}

RULES:
- contractValue is a number (not a string); use 0 if none is stated
- If a field is not found, use null
- Output ONLY JSON without markdown

ANSWER:"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_every_type_has_a_template_mentioning_its_fields() {
        let expectations = [
            (DocumentType::Receipt, "storeName"),
            (DocumentType::Invoice, "invoiceNumber"),
            (DocumentType::PurchaseOrder, "poNumber"),
            (DocumentType::BankStatement, "accountNumber"),
            (DocumentType::StockCard, "openingStock"),
            (DocumentType::Contract, "contractValue"),
        ];

        for (doc_type, field) in expectations {
            let prompt = extraction_prompt(doc_type, "SOME OCR TEXT");
            assert!(prompt.contains("SOME OCR TEXT"), "{} prompt lacks OCR text", doc_type);
            assert!(prompt.contains(field), "{} prompt lacks {}", doc_type, field);
        }
    }

    #[test]
    fn test_classification_prompt_lists_whole_vocabulary() {
        let prompt = classification_prompt("text");
        for doc_type in DocumentType::ALL {
            assert!(prompt.contains(doc_type.as_str()));
        }
    }
}
