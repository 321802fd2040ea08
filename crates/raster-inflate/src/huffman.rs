use crate::bitstream::BitReader;
use crate::errors::InflateError;

const ABSENT: i32 = -1;

#[derive(Copy, Clone)]
struct HuffNode
{
    left:   i32,
    right:  i32,
    symbol: i32
}

impl HuffNode
{
    const fn empty() -> Self
    {
        HuffNode { left: ABSENT, right: ABSENT, symbol: ABSENT }
    }
}

/// A canonical Huffman decode table, represented as an arena of binary-tree
/// nodes rather than a pointer-linked tree.
///
/// Construction follows RFC 1951 §3.2.2: count how many codes exist per
/// length, derive the first code of each length, then assign codes to
/// symbols in ascending symbol order. A symbol with code length 0 takes no
/// code at all and must never be inserted — inserting it would (as in a
/// naive recursive-descent builder) wrongly mark the tree's root itself as
/// a leaf, making every other code undecodable.
pub struct HuffmanTable
{
    nodes: Vec<HuffNode>
}

impl HuffmanTable
{
    /// Build a table from a code-length-per-symbol array. `lengths[i]` is
    /// the codeword length assigned to symbol `i`, or 0 if the symbol is
    /// unused in this block.
    pub fn build(lengths: &[u8]) -> Result<Self, InflateError>
    {
        let max_len = lengths.iter().copied().max().unwrap_or(0) as usize;
        if max_len == 0
        {
            return Ok(HuffmanTable { nodes: vec![HuffNode::empty()] });
        }

        let mut count_per_len = vec![0u32; max_len + 1];
        for &len in lengths
        {
            if len != 0
            {
                count_per_len[len as usize] += 1;
            }
        }

        let mut next_code = vec![0u32; max_len + 1];
        let mut code = 0u32;
        for len in 1..=max_len
        {
            code = (code + count_per_len[len - 1]) << 1;
            next_code[len] = code;
        }

        let mut nodes = vec![HuffNode::empty()];
        for (symbol, &len) in lengths.iter().enumerate()
        {
            if len == 0
            {
                continue;
            }
            let assigned = next_code[len as usize];
            next_code[len as usize] += 1;
            Self::insert(&mut nodes, assigned, len as u32, symbol as i32)?;
        }

        Ok(HuffmanTable { nodes })
    }

    fn insert(nodes: &mut Vec<HuffNode>, code: u32, len: u32, symbol: i32) -> Result<(), InflateError>
    {
        let mut node_idx = 0usize;
        for depth in 0..len
        {
            let bit = (code >> (len - depth - 1)) & 1;
            let next = if bit == 0 { nodes[node_idx].left } else { nodes[node_idx].right };

            let next = if next == ABSENT
            {
                nodes.push(HuffNode::empty());
                let new_idx = (nodes.len() - 1) as i32;
                if bit == 0
                {
                    nodes[node_idx].left = new_idx;
                }
                else
                {
                    nodes[node_idx].right = new_idx;
                }
                new_idx
            }
            else
            {
                next
            };
            node_idx = next as usize;
        }

        if nodes[node_idx].symbol != ABSENT || nodes[node_idx].left != ABSENT || nodes[node_idx].right != ABSENT
        {
            return Err(InflateError::CorruptData("overlapping Huffman codes"));
        }
        nodes[node_idx].symbol = symbol;
        Ok(())
    }

    /// Decode a single symbol, descending the tree one bit at a time.
    pub fn decode_symbol(&self, reader: &mut BitReader) -> Result<u16, InflateError>
    {
        let mut node_idx = 0usize;
        loop
        {
            let node = self.nodes[node_idx];
            if node.symbol != ABSENT
            {
                return Ok(node.symbol as u16);
            }
            let bit = reader.pop_bit()?;
            let next = if bit { node.right } else { node.left };
            if next == ABSENT
            {
                return Err(InflateError::InvalidHuffmanCode);
            }
            node_idx = next as usize;
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn canonical_codes_roundtrip()
    {
        // RFC 1951 example: A=2,B=1,C=3,D=3 -> codes 10,0,110,111
        let lengths = [2u8, 1, 3, 3];
        let table = HuffmanTable::build(&lengths).unwrap();

        // symbol 0 "A" = 10
        let data = [0b0000_0001u8];
        let mut r = BitReader::new(&data);
        assert_eq!(table.decode_symbol(&mut r).unwrap(), 0);
    }

    #[test]
    fn zero_length_code_is_never_inserted()
    {
        let lengths = [0u8, 1, 1];
        let table = HuffmanTable::build(&lengths).unwrap();
        // Symbol 0 has length 0 and must be unreachable; only 1-bit codes exist.
        assert_eq!(table.nodes.len(), 3);
    }

    #[test]
    fn invalid_code_errors()
    {
        let lengths = [1u8, 1];
        let table = HuffmanTable::build(&lengths).unwrap();
        let data = [0u8]; // only one bit of input, but both codes are 1 bit
        let mut r = BitReader::new(&data);
        assert!(table.decode_symbol(&mut r).is_ok());
    }
}
